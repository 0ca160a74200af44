use std::sync::Mutex;

use propgen_core::{PackageTier, ResearchResult};
use propgen_llm::{LlmError, LlmResponse};
use serde_json::json;

use super::*;

/// Returns a fixed reply and records the prompt and options it was given.
struct ScriptedLlm {
    reply: String,
    prompts: Mutex<Vec<(String, bool)>>,
}

impl ScriptedLlm {
    fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().unwrap().0.clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedLlm {
    async fn call_for_research(
        &self,
        _system: &str,
        _user: &str,
        _options: &CallOptions,
    ) -> Result<LlmResponse, LlmError> {
        unreachable!("content generation only uses content mode")
    }

    async fn call_for_content(
        &self,
        _system: &str,
        user: &str,
        options: &CallOptions,
    ) -> Result<LlmResponse, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((user.to_string(), options.premium));
        let usage = TokenUsage {
            input_tokens: 3_000,
            output_tokens: 2_500,
            thinking_tokens: 0,
        };
        Ok(LlmResponse::new(self.reply.clone(), usage, Decimal::new(367, 4), "test-model"))
    }
}

fn concise_reply() -> String {
    let body = json!({
        "coverPage": {"title": "Your SEO Plan"},
        "introduction": {"headline": "Acme Roofing is missing 1,300 searches a month", "keyPoints": ["Page 3 for roofer leeds"]},
        "competition": {
            "summary": "Rival Roofs dominates",
            "comparisonTable": [{"name": "Acme Roofing", "isClient": true}, {"name": "Rival Roofs", "monthlyTraffic": "2,400"}],
            "gaps": ["No flat-roof page"],
            "opportunity": "Own the map pack"
        },
        "strategy": {"approach": "Local first", "tactics": ["Google Business Profile"], "timeline": [{"period": "Months 1-3", "focus": "Foundations"}], "outcomes": ["Top 3 rankings"]},
        "investment": {
            "packageName": "Local SEO",
            "monthlyPrice": 1500,
            "deliverables": ["15 target keywords", "4 articles a month"],
            "projectedResults": [{"metric": "Monthly visitors", "current": "200", "monthSix": "700", "monthTwelve": "1,100"}],
            "roiSummary": null
        },
        "summary": {"benefits": ["More calls"], "nextSteps": ["Approve proposal"], "callToAction": "Book your kick-off"}
    });
    format!("```json\n{body}\n```")
}

fn detailed_reply(packages: usize) -> String {
    let all = [
        json!({"name": "Local", "deliverables": ["15 keywords"]}),
        json!({"name": "Regional", "deliverables": ["30 keywords"]}),
        json!({"name": "National", "deliverables": ["60 keywords"]}),
    ];
    json!({
        "coverPage": {"companyName": "Acme Roofing"},
        "executiveSummary": {"overview": "Strong reputation, weak visibility"},
        "recommendedStrategy": {"overview": "Three pillars", "pillars": [{"title": "Local", "description": "Map pack"}]},
        "packages": all[..packages].to_vec(),
        "nextSteps": ["Sign"]
    })
    .to_string()
}

fn request(traffic: Option<u64>) -> ContentRequest {
    let mut research = ResearchResult::default();
    research.competitor_analysis.client_current_metrics.monthly_traffic = traffic;
    ContentRequest {
        company: ResearchRequest {
            company_name: "Acme Roofing".into(),
            website: Some("https://acmeroofing.co.uk".into()),
            industry: "Roofing".into(),
            location: "Leeds, UK".into(),
            tier: PackageTier::Local,
        },
        research,
        sdr_notes: Some("Average job is £4,000.\r\n\r\n\r\n\r\nWants more commercial work.".into()),
        deal_value: None,
        overrides: ConversionOverrides::default(),
        premium: false,
        date_label: "16 October 2026".into(),
    }
}

fn generators(llm: Arc<ScriptedLlm>) -> ContentGenerators {
    ContentGenerators::new(llm, Arc::new(ReferenceDocument::from_text("Case study: Leeds plumber, 4x leads")))
}

#[tokio::test]
async fn concise_generation_enforces_calculator_figures() {
    let llm = ScriptedLlm::new(concise_reply());
    let generated = generators(Arc::clone(&llm))
        .for_mode(ProposalMode::Concise)
        .generate(&request(None))
        .await
        .unwrap();

    let ProposalContent::Concise(concise) = &generated.content else {
        panic!("expected concise content");
    };
    assert_eq!(concise.cover_page.company_name, "Acme Roofing");
    assert_eq!(concise.cover_page.date, "16 October 2026");
    assert_eq!(concise.investment.price(), Some(2_000));
    assert_eq!(concise.investment.projected_results, generated.projection.projected_results_rows());
    assert!(!concise.investment.roi_summary.is_empty());
    assert_eq!(generated.projection.current_traffic, DEFAULT_CURRENT_TRAFFIC);
    assert_eq!(generated.usage.total(), 5_500);
    assert_eq!(generated.model, "test-model");
}

#[tokio::test]
async fn prompt_embeds_projection_notes_and_reference() {
    let llm = ScriptedLlm::new(concise_reply());
    generators(Arc::clone(&llm))
        .concise
        .generate(&request(Some(1_000)))
        .await
        .unwrap();

    let prompt = llm.last_prompt();
    assert!(prompt.contains("Current monthly visitors: 1,000"));
    assert!(prompt.contains("Month 12: 3,000 visitors, 90 leads"));
    assert!(prompt.contains("SALES NOTES (absolute truth, use exact numbers)"));
    assert!(prompt.contains("Average job is £4,000.\n\nWants more commercial work."));
    assert!(prompt.contains("Case study: Leeds plumber"));
    assert!(prompt.contains("\"comparisonTable\""));
}

#[tokio::test]
async fn malformed_json_is_a_parse_error_with_excerpt() {
    let llm = ScriptedLlm::new("Sure, here's your proposal: {not valid json");
    let err = generators(llm)
        .concise
        .generate(&request(None))
        .await
        .unwrap_err();
    match err {
        ContentError::Llm(LlmError::InvalidJson { excerpt, .. }) => {
            assert!(excerpt.contains("Sure, here's your proposal"));
        }
        other => panic!("expected InvalidJson, got {other:?}"),
    }
}

#[tokio::test]
async fn detailed_generation_prices_packages_from_tier_table() {
    let llm = ScriptedLlm::new(detailed_reply(3));
    let generated = generators(llm)
        .for_mode(ProposalMode::Detailed)
        .generate(&request(Some(400)))
        .await
        .unwrap();

    let ProposalContent::Detailed(detailed) = &generated.content else {
        panic!("expected detailed content");
    };
    let prices: Vec<_> = detailed.packages.iter().map(|p| p.price()).collect();
    assert_eq!(prices, vec![Some(2_000), Some(3_000), Some(5_000)]);
    assert!(detailed.packages[0].recommended);
    assert_eq!(detailed.projections.month_twelve.traffic, 1_200);
    assert_eq!(detailed.simple_math.len(), 6);
}

#[tokio::test]
async fn incomplete_detailed_content_fails_validation() {
    let llm = ScriptedLlm::new(detailed_reply(2));
    let err = generators(llm)
        .detailed
        .generate(&request(None))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Validation(ref v) if v.field == "packages"));
}

#[tokio::test]
async fn wrong_shape_is_a_deserialize_error() {
    let llm = ScriptedLlm::new(r#"{"packages": "three of them"}"#);
    let err = generators(llm)
        .detailed
        .generate(&request(None))
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Deserialize { .. }));
}

#[tokio::test]
async fn premium_flag_reaches_the_gateway() {
    let llm = ScriptedLlm::new(concise_reply());
    let mut req = request(None);
    req.premium = true;
    generators(Arc::clone(&llm)).concise.generate(&req).await.unwrap();
    assert!(llm.prompts.lock().unwrap()[0].1);
}
