//! Research inputs and outputs shared by the research agents, the content
//! generators and the renderers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::tier::PackageTier;

/// Immutable input to one generation run's research stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    pub company_name: String,
    pub website: Option<String>,
    pub industry: String,
    pub location: String,
    pub tier: PackageTier,
}

impl ResearchRequest {
    /// Bare host of the website (`https://www.acme.co.uk/x` → `acme.co.uk`).
    #[must_use]
    pub fn domain(&self) -> Option<String> {
        self.website.as_deref().and_then(domain_of)
    }
}

/// Lowercased host without scheme, `www.` prefix, port or path.
#[must_use]
pub fn domain_of(url: &str) -> Option<String> {
    let trimmed = url.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .split(':')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() || !host.contains('.') {
        None
    } else {
        Some(host)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAnalysis {
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_overview: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub opportunities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIntelligence {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub industry_trends: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub market_size: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub seasonality: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub strategy: String,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub estimated_traffic: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMetrics {
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub monthly_traffic: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub ranking_keywords: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub domain_authority: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub top_competitors: Vec<Competitor>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub client_current_metrics: ClientMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    #[serde(deserialize_with = "lenient::string")]
    pub keyword: String,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub search_volume: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordResearch {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub primary_keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLocation {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub population: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub demand: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub competition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStrategy {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub target_locations: Vec<TargetLocation>,
}

/// Ranking data for one service + location query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordPosition {
    pub keyword: String,
    pub location: String,
    /// Client's organic position in the top ten, if present.
    pub client_position: Option<u32>,
    /// Derived from the engine's total-results count, not a reported volume.
    pub estimated_volume: u64,
    pub top_domains: Vec<String>,
}

/// A domain that ranks for the client's services, inferred from real results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredCompetitor {
    pub domain: String,
    pub name: String,
    pub best_position: u32,
    pub appearances: u32,
    pub sample_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOpportunity {
    pub location: String,
    pub query: String,
    pub estimated_volume: u64,
    /// `low` / `medium` / `high`, from how many directories crowd the results.
    pub competition: String,
}

/// Search-engine-derived facts gathered before the LLM research call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedResearch {
    pub keyword_data: Vec<KeywordPosition>,
    pub competitors: Vec<DiscoveredCompetitor>,
    pub location_opportunities: Vec<LocationOpportunity>,
    /// "People also ask" questions nobody in the top ten answers well.
    pub content_gaps: Vec<String>,
    pub queries_run: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResult {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub company_analysis: CompanyAnalysis,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub market_intelligence: MarketIntelligence,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub competitor_analysis: CompetitorAnalysis,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub keyword_research: KeywordResearch,
    #[serde(default)]
    pub location_strategy: Option<LocationStrategy>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub total_tokens_used: u64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub estimated_cost: Decimal,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub thinking_tokens_used: u64,
    #[serde(default)]
    pub enhanced_research: Option<EnhancedResearch>,
}

impl ResearchResult {
    /// The client's monthly traffic when research surfaced a non-zero figure.
    #[must_use]
    pub fn current_monthly_traffic(&self) -> Option<u64> {
        self.competitor_analysis
            .client_current_metrics
            .monthly_traffic
            .filter(|t| *t > 0)
    }

    /// Competitor names, preferring domains observed in real rankings.
    #[must_use]
    pub fn competitor_names(&self, limit: usize) -> Vec<String> {
        let discovered = self
            .enhanced_research
            .iter()
            .flat_map(|e| e.competitors.iter().map(|c| c.domain.clone()));
        let inferred = self
            .competitor_analysis
            .top_competitors
            .iter()
            .map(|c| c.name.clone());
        let mut names: Vec<String> = Vec::new();
        for name in discovered.chain(inferred) {
            if !name.trim().is_empty() && !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
            if names.len() >= limit {
                break;
            }
        }
        names
    }

    /// Content-gap questions, empty when no search data was gathered.
    #[must_use]
    pub fn content_gaps(&self) -> &[String] {
        self.enhanced_research
            .as_ref()
            .map_or(&[][..], |e| e.content_gaps.as_slice())
    }
}
