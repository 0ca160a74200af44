//! Content-mode prompt text.
//!
//! Every projection number is written out in full so the model narrates
//! figures instead of deriving them.

use std::fmt::Write as _;

use propgen_core::text::{format_gbp, format_number, sanitize_for_prompt};
use propgen_core::ProjectionCalculation;

use crate::generator::ContentRequest;
use crate::reference::MAX_PROMPT_CHARS;

const MAX_KEYWORDS: usize = 15;
const MAX_COMPETITORS: usize = 5;

pub(crate) const DETAILED_SYSTEM_PROMPT: &str = "\
You write SEO proposals for a UK digital marketing agency.
Tone: direct, confident, plain English. British spelling. No hype words.
Every projection figure you are given is final: copy it exactly, never recalculate or round it.
Facts in the SALES NOTES section are absolute truth and override anything in the research.
Exactly three packages: Local, Regional and National, in that order.
Respond with a single JSON object matching the schema and nothing else.";

pub(crate) const CONCISE_SYSTEM_PROMPT: &str = "\
You write short, scannable SEO proposals for a UK digital marketing agency.
The whole proposal must read in under five minutes: 1,500 to 2,000 words in total.
Use bullet points only. No prose paragraphs; every string is one sentence at most.
Every projection figure you are given is final: copy it exactly, never recalculate or round it.
Facts in the SALES NOTES section are absolute truth and override anything in the research.
Respond with a single JSON object matching the schema and nothing else.";

pub(crate) const DETAILED_SCHEMA: &str = r#"{
  "coverPage": {"companyName": "string", "title": "string", "subtitle": "string", "preparedFor": "string", "preparedBy": "string"},
  "executiveSummary": {"overview": "string", "keyFindings": ["string"], "recommendation": "string"},
  "brutalTruthCallouts": [{"title": "string", "message": "string"}],
  "statisticsCards": [{"value": "string", "label": "string", "context": "string"}],
  "marketOpportunity": {"summary": "string", "searchDemand": ["string"], "growthDrivers": ["string"]},
  "currentSituation": {"strengths": ["string"], "weaknesses": ["string"], "opportunities": ["string"], "threats": ["string"]},
  "recommendedStrategy": {"overview": "string", "pillars": [{"title": "string", "description": "string", "actions": ["string"]}]},
  "technicalSeo": {"summary": "string", "tactics": ["string"]},
  "contentStrategy": {"summary": "string", "topics": ["string"], "articlesPerMonth": 0},
  "localSeo": {"summary": "string", "tactics": ["string"]},
  "linkBuilding": {"summary": "string", "tactics": ["string"]},
  "competitorComparison": [{"name": "string", "monthlyTraffic": 0, "rankingKeywords": 0, "domainAuthority": 0, "notes": "string", "isClient": false}],
  "packages": [{"name": "string", "description": "string", "deliverables": ["string"], "recommended": false}],
  "projections": {
    "monthSix": {"traffic": 0, "leads": 0, "customers": 0, "revenue": 0},
    "monthTwelve": {"traffic": 0, "leads": 0, "customers": 0, "revenue": 0},
    "roi": {"annualInvestment": 0, "annualRevenue": 0, "roiMultiple": 0, "summary": "string"}
  },
  "simpleMath": [{"label": "string", "calculation": "string", "result": "string"}],
  "nextSteps": ["string"]
}"#;

pub(crate) const CONCISE_SCHEMA: &str = r#"{
  "coverPage": {"companyName": "string", "title": "string", "subtitle": "string"},
  "introduction": {"headline": "string", "keyPoints": ["string"]},
  "competition": {
    "summary": "string",
    "comparisonTable": [{"name": "string", "monthlyTraffic": 0, "rankingKeywords": 0, "notes": "string", "isClient": false}],
    "gaps": ["string"],
    "opportunity": "string"
  },
  "strategy": {"approach": "string", "tactics": ["string"], "timeline": [{"period": "string", "focus": "string"}], "outcomes": ["string"]},
  "investment": {
    "packageName": "string",
    "deliverables": ["string"],
    "projectedResults": [{"metric": "string", "current": "string", "monthSix": "string", "monthTwelve": "string"}],
    "roiSummary": "string"
  },
  "summary": {"benefits": ["string"], "nextSteps": ["string"], "callToAction": "string"}
}"#;

/// Company, sales notes, projections, research slice and reference text.
pub(crate) fn context_sections(
    request: &ContentRequest,
    projection: &ProjectionCalculation,
    reference: Option<&str>,
) -> String {
    let mut out = String::new();
    let company = &request.company;
    let _ = writeln!(out, "## COMPANY");
    let _ = writeln!(out, "Name: {}", sanitize_for_prompt(&company.company_name));
    if let Some(website) = company.website.as_deref() {
        let _ = writeln!(out, "Website: {}", website.trim());
    }
    let _ = writeln!(out, "Industry: {}", sanitize_for_prompt(&company.industry));
    let _ = writeln!(out, "Location: {}", sanitize_for_prompt(&company.location));
    let _ = writeln!(out, "Proposal date: {}", request.date_label);

    if let Some(notes) = request.sdr_notes.as_deref().map(sanitize_for_prompt) {
        if !notes.is_empty() {
            let _ = writeln!(
                out,
                "\n## SALES NOTES (absolute truth, use exact numbers)\n{notes}"
            );
        }
    }

    let _ = writeln!(out, "\n{}", projection_section(projection));
    let _ = writeln!(out, "{}", research_section(request));

    if let Some(reference) = reference {
        let trimmed: String = reference.chars().take(MAX_PROMPT_CHARS).collect();
        let _ = writeln!(
            out,
            "\n## AGENCY REFERENCE (credentials and case studies you may cite)\n{}",
            sanitize_for_prompt(&trimmed)
        );
    }
    out
}

fn projection_section(p: &ProjectionCalculation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## PROJECTIONS (final figures, copy exactly)");
    let _ = writeln!(out, "Package: {} at {}/month", p.tier.display_name(), format_gbp(p.monthly_investment));
    let _ = writeln!(out, "Current monthly visitors: {}", format_number(p.current_traffic));
    let _ = writeln!(out, "Growth multiplier: {}x", p.growth_multiplier);
    let _ = writeln!(
        out,
        "Month 6: {} visitors, {} leads, {} customers, {} revenue/month",
        format_number(p.month_six.traffic),
        format_number(p.month_six.leads),
        format_number(p.month_six.customers),
        format_gbp(p.month_six.revenue)
    );
    let _ = writeln!(
        out,
        "Month 12: {} visitors, {} leads, {} customers, {} revenue/month",
        format_number(p.projected_traffic),
        format_number(p.monthly_leads),
        format_number(p.monthly_customers),
        format_gbp(p.monthly_revenue)
    );
    let _ = writeln!(
        out,
        "Conversion: {:.1}% visitor to lead, {:.0}% lead to customer, average deal {}",
        p.conversion_rates.visitor_to_lead * 100.0,
        p.conversion_rates.lead_to_customer * 100.0,
        format_gbp(p.deal_value)
    );
    let _ = writeln!(
        out,
        "Annual: {} investment, {} revenue, ROI {:.1}x",
        format_gbp(p.annual_investment),
        format_gbp(p.annual_revenue),
        p.roi_multiple
    );
    let _ = writeln!(out, "Simple math steps:");
    for step in p.simple_math_steps() {
        let _ = writeln!(out, "- {}: {} = {}", step.label, step.calculation, step.result);
    }
    out
}

fn research_section(request: &ContentRequest) -> String {
    let research = &request.research;
    let mut out = String::new();
    let _ = writeln!(out, "## RESEARCH");
    if !research.company_analysis.business_overview.is_empty() {
        let _ = writeln!(
            out,
            "Overview: {}",
            sanitize_for_prompt(&research.company_analysis.business_overview)
        );
    }
    for (label, items) in [
        ("Strengths", &research.company_analysis.strengths),
        ("Weaknesses", &research.company_analysis.weaknesses),
        ("Opportunities", &research.company_analysis.opportunities),
        ("Industry trends", &research.market_intelligence.industry_trends),
    ] {
        if !items.is_empty() {
            let _ = writeln!(out, "{label}: {}", items.join("; "));
        }
    }

    let keywords: Vec<String> = research
        .keyword_research
        .primary_keywords
        .iter()
        .take(MAX_KEYWORDS)
        .map(|k| match k.search_volume {
            Some(v) => format!("{} ({}/mo)", k.keyword, format_number(v)),
            None => k.keyword.clone(),
        })
        .collect();
    if !keywords.is_empty() {
        let _ = writeln!(out, "Keywords: {}", keywords.join(", "));
    }

    let competitors = research.competitor_names(MAX_COMPETITORS);
    if !competitors.is_empty() {
        let _ = writeln!(out, "Competitors (use these real names): {}", competitors.join(", "));
    }
    let metrics = &research.competitor_analysis.client_current_metrics;
    if let Some(k) = metrics.ranking_keywords {
        let _ = writeln!(out, "Client ranking keywords: {k}");
    }

    if let Some(enhanced) = &research.enhanced_research {
        for l in enhanced.location_opportunities.iter().take(5) {
            let _ = writeln!(
                out,
                "Location opportunity: {} (\"{}\", est. {}/mo, {} competition)",
                l.location,
                l.query,
                format_number(l.estimated_volume),
                l.competition
            );
        }
    }
    let gaps = research.content_gaps();
    if !gaps.is_empty() {
        let _ = writeln!(out, "Content gaps (questions searchers ask): {}", gaps.join(" | "));
    }
    out
}

pub(crate) fn user_prompt(context: &str, schema: &str, instructions: &str) -> String {
    format!("{context}\n## TASK\n{instructions}\n\nReturn JSON matching this schema:\n{schema}")
}
