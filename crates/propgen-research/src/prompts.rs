//! Research-mode prompt text.

use std::fmt::Write as _;

use propgen_core::text::{format_number, sanitize_for_prompt};
use propgen_core::{EnhancedResearch, IndustryServices, ResearchRequest};

pub(crate) const RESEARCH_SYSTEM_PROMPT: &str = "\
You are a senior SEO strategist preparing research for a UK digital marketing agency.
You analyse a prospect's market, competitors and keyword opportunities.
Base competitor and ranking statements on the search data provided; do not invent rankings.
When a figure is an estimate, say so in the surrounding text, never in numeric fields.
Respond with a single JSON object and nothing else.";

const RESPONSE_SCHEMA: &str = r#"{
  "companyAnalysis": {"businessOverview": "string", "strengths": ["string"], "weaknesses": ["string"], "opportunities": ["string"]},
  "marketIntelligence": {"industryTrends": ["string"], "marketSize": "string", "seasonality": "string"},
  "competitorAnalysis": {
    "topCompetitors": [{"name": "string", "website": "string", "strategy": "string", "estimatedTraffic": 0}],
    "clientCurrentMetrics": {"monthlyTraffic": 0, "rankingKeywords": 0, "domainAuthority": 0}
  },
  "keywordResearch": {"primaryKeywords": [{"keyword": "string", "searchVolume": 0, "difficulty": "low|medium|high", "businessValue": "low|medium|high"}]},
  "locationStrategy": {"targetLocations": [{"name": "string", "population": 0, "demand": "string", "competition": "string"}]}
}"#;

pub(crate) fn research_prompt(
    request: &ResearchRequest,
    services: &IndustryServices,
    enhanced: &EnhancedResearch,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## Company");
    let _ = writeln!(out, "Name: {}", sanitize_for_prompt(&request.company_name));
    let _ = writeln!(
        out,
        "Website: {}",
        request.website.as_deref().map_or("not provided", str::trim)
    );
    let _ = writeln!(out, "Industry: {}", sanitize_for_prompt(&request.industry));
    let _ = writeln!(out, "Location: {}", sanitize_for_prompt(&request.location));
    let _ = writeln!(
        out,
        "Package under consideration: {} ({} target keywords, {} articles per month)",
        request.tier.display_name(),
        request.tier.target_keywords(),
        request.tier.articles_per_month()
    );
    let _ = writeln!(out, "Core services: {}", services.primary_services.join(", "));
    if !services.related_terms.is_empty() {
        let _ = writeln!(out, "Related terms: {}", services.related_terms.join(", "));
    }

    let _ = writeln!(out, "\n## Live search data ({} queries)", enhanced.queries_run);
    for kw in &enhanced.keyword_data {
        let position = kw
            .client_position
            .map_or_else(|| "not in top 10".to_string(), |p| format!("position {p}"));
        let _ = writeln!(
            out,
            "- \"{}\": client {}, est. {} searches/month, top domains: {}",
            kw.keyword,
            position,
            format_number(kw.estimated_volume),
            kw.top_domains.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
        );
    }

    if !enhanced.competitors.is_empty() {
        let _ = writeln!(out, "\n## Competitors observed in real rankings");
        for c in &enhanced.competitors {
            let _ = writeln!(
                out,
                "- {} ({}): best position {}, appears in {} searches",
                c.name, c.domain, c.best_position, c.appearances
            );
        }
    }

    if !enhanced.location_opportunities.is_empty() {
        let _ = writeln!(out, "\n## Location opportunities");
        for l in &enhanced.location_opportunities {
            let _ = writeln!(
                out,
                "- {}: \"{}\", est. {} searches/month, {} competition",
                l.location,
                l.query,
                format_number(l.estimated_volume),
                l.competition
            );
        }
    }

    if !enhanced.content_gaps.is_empty() {
        let _ = writeln!(out, "\n## Questions searchers ask");
        for q in &enhanced.content_gaps {
            let _ = writeln!(out, "- {q}");
        }
    }

    let _ = writeln!(
        out,
        "\n## Task\nAnalyse this company's SEO position. Use the competitors listed above as the \
         top competitors unless the data shows none. Estimate the client's monthly organic \
         traffic conservatively; use 0 if there is no basis for an estimate.\n\n\
         Return JSON matching this schema:\n{RESPONSE_SCHEMA}"
    );
    out
}
