//! Proposal content: the one schema shared by the content generators and the
//! renderers.
//!
//! LLM output is parsed into these structs, projection figures are forced to
//! the calculator's values, and [`ProposalContent::validate`] rejects anything
//! a renderer could not draw. A value that passed validation is safe to hand
//! to any renderer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lenient;
use crate::projection::ProjectionCalculation;
use crate::text::{format_gbp, format_number};
use crate::tier::PackageTier;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("proposal content is incomplete: {field} {problem}")]
pub struct ValidationError {
    pub field: String,
    pub problem: String,
}

impl ValidationError {
    fn new(field: &str, problem: &str) -> Self {
        Self {
            field: field.to_string(),
            problem: problem.to_string(),
        }
    }
}

/// Both content variants, tagged once at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProposalContent {
    Detailed(DetailedProposal),
    Concise(ConciseProposal),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverPage {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub prepared_for: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub prepared_by: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathStep {
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub calculation: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    #[serde(default, deserialize_with = "lenient::string")]
    pub metric: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub current: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub month_six: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub month_twelve: String,
}

/// One row of a competitor comparison table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub monthly_traffic: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub ranking_keywords: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub domain_authority: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: String,
    #[serde(default)]
    pub is_client: bool,
}

// ---------------------------------------------------------------------------
// Detailed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    #[serde(default, deserialize_with = "lenient::string")]
    pub overview: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub key_findings: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrutalTruth {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    #[serde(default, deserialize_with = "lenient::string")]
    pub value: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOpportunity {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub search_demand: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub growth_drivers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swot {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub opportunities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPillar {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedStrategy {
    #[serde(default, deserialize_with = "lenient::string")]
    pub overview: String,
    #[serde(default)]
    pub pillars: Vec<StrategyPillar>,
}

/// Summary plus bullet list; used for technical SEO, link building and local SEO.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticSection {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tactics: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStrategy {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub articles_per_month: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageOption {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Set from position after parsing; the LLM's own value is not trusted.
    #[serde(default, deserialize_with = "lenient::opt_tier")]
    pub tier: Option<PackageTier>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub monthly_price: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub deliverables: Vec<String>,
    #[serde(default)]
    pub recommended: bool,
}

impl PackageOption {
    /// Price from the tier table, falling back to the parsed figure.
    #[must_use]
    pub fn price(&self) -> Option<u64> {
        self.tier.map(PackageTier::monthly_price).or(self.monthly_price)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSnapshot {
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub traffic: u64,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub leads: u64,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub customers: u64,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub revenue: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiSummary {
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub annual_investment: u64,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub annual_revenue: u64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub roi_multiple: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projections {
    #[serde(default)]
    pub month_six: ProjectionSnapshot,
    #[serde(default)]
    pub month_twelve: ProjectionSnapshot,
    #[serde(default)]
    pub roi: RoiSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedProposal {
    #[serde(default)]
    pub cover_page: CoverPage,
    #[serde(default)]
    pub executive_summary: ExecutiveSummary,
    #[serde(default)]
    pub brutal_truth_callouts: Vec<BrutalTruth>,
    #[serde(default)]
    pub statistics_cards: Vec<StatCard>,
    #[serde(default)]
    pub market_opportunity: MarketOpportunity,
    #[serde(default)]
    pub current_situation: Swot,
    #[serde(default)]
    pub recommended_strategy: RecommendedStrategy,
    #[serde(default)]
    pub technical_seo: TacticSection,
    #[serde(default)]
    pub content_strategy: ContentStrategy,
    #[serde(default)]
    pub local_seo: Option<TacticSection>,
    #[serde(default)]
    pub link_building: TacticSection,
    #[serde(default)]
    pub competitor_comparison: Vec<ComparisonRow>,
    #[serde(default)]
    pub packages: Vec<PackageOption>,
    #[serde(default)]
    pub projections: Projections,
    #[serde(default)]
    pub simple_math: Vec<MathStep>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub next_steps: Vec<String>,
}

// ---------------------------------------------------------------------------
// Concise
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Introduction {
    #[serde(default, deserialize_with = "lenient::string")]
    pub headline: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default)]
    pub comparison_table: Vec<ComparisonRow>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gaps: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub opportunity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePhase {
    #[serde(default, deserialize_with = "lenient::string")]
    pub period: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub focus: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConciseStrategy {
    #[serde(default, deserialize_with = "lenient::string")]
    pub approach: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tactics: Vec<String>,
    #[serde(default)]
    pub timeline: Vec<TimelinePhase>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub outcomes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(default, deserialize_with = "lenient::string")]
    pub package_name: String,
    #[serde(default, deserialize_with = "lenient::opt_tier")]
    pub tier: Option<PackageTier>,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub monthly_price: Option<u64>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub deliverables: Vec<String>,
    #[serde(default)]
    pub projected_results: Vec<ResultRow>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub roi_summary: String,
}

impl Investment {
    #[must_use]
    pub fn price(&self) -> Option<u64> {
        self.tier.map(PackageTier::monthly_price).or(self.monthly_price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConciseSummary {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub benefits: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub next_steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub call_to_action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConciseProposal {
    #[serde(default)]
    pub cover_page: CoverPage,
    #[serde(default)]
    pub introduction: Introduction,
    #[serde(default)]
    pub competition: Competition,
    #[serde(default)]
    pub strategy: ConciseStrategy,
    #[serde(default)]
    pub investment: Investment,
    #[serde(default)]
    pub summary: ConciseSummary,
}

// ---------------------------------------------------------------------------
// Behaviour
// ---------------------------------------------------------------------------

impl ProposalContent {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Detailed(_) => "detailed",
            Self::Concise(_) => "concise",
        }
    }

    #[must_use]
    pub fn cover_page(&self) -> &CoverPage {
        match self {
            Self::Detailed(d) => &d.cover_page,
            Self::Concise(c) => &c.cover_page,
        }
    }

    /// Checks every field a renderer dereferences.
    ///
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Detailed(d) => d.validate(),
            Self::Concise(c) => c.validate(),
        }
    }

    /// Overwrites every projection figure with calculator output. Returns
    /// `true` when any LLM-supplied figure differed.
    pub fn apply_projection(&mut self, calc: &ProjectionCalculation) -> bool {
        match self {
            Self::Detailed(d) => d.apply_projection(calc),
            Self::Concise(c) => c.apply_projection(calc),
        }
    }

    /// Fills cover-page gaps from the request.
    pub fn fill_cover(&mut self, company_name: &str, date: &str) {
        let cover = match self {
            Self::Detailed(d) => &mut d.cover_page,
            Self::Concise(c) => &mut c.cover_page,
        };
        if cover.company_name.trim().is_empty() {
            cover.company_name = company_name.to_string();
        }
        if cover.date.trim().is_empty() {
            cover.date = date.to_string();
        }
        if cover.title.trim().is_empty() {
            cover.title = "SEO Growth Proposal".to_string();
        }
    }
}

fn require_text(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "is empty"))
    } else {
        Ok(())
    }
}

fn require_items<T>(items: &[T], field: &str) -> Result<(), ValidationError> {
    if items.is_empty() {
        Err(ValidationError::new(field, "has no entries"))
    } else {
        Ok(())
    }
}

impl DetailedProposal {
    /// # Errors
    ///
    /// Returns the first field a renderer could not draw.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.cover_page.company_name, "coverPage.companyName")?;
        require_text(&self.executive_summary.overview, "executiveSummary.overview")?;
        require_items(&self.recommended_strategy.pillars, "recommendedStrategy.pillars")?;
        if self.packages.len() != 3 {
            return Err(ValidationError::new(
                "packages",
                &format!("must contain exactly 3 options, found {}", self.packages.len()),
            ));
        }
        for (i, package) in self.packages.iter().enumerate() {
            require_text(&package.name, &format!("packages[{i}].name"))?;
            if package.price().is_none() {
                return Err(ValidationError::new(&format!("packages[{i}].monthlyPrice"), "is missing"));
            }
        }
        require_items(&self.simple_math, "simpleMath")?;
        require_items(&self.next_steps, "nextSteps")?;
        Ok(())
    }

    pub fn apply_projection(&mut self, calc: &ProjectionCalculation) -> bool {
        let month_six = ProjectionSnapshot {
            traffic: calc.month_six.traffic,
            leads: calc.month_six.leads,
            customers: calc.month_six.customers,
            revenue: calc.month_six.revenue,
        };
        let month_twelve = ProjectionSnapshot {
            traffic: calc.projected_traffic,
            leads: calc.monthly_leads,
            customers: calc.monthly_customers,
            revenue: calc.monthly_revenue,
        };
        let drifted = self.projections.month_six != month_six
            || self.projections.month_twelve != month_twelve
            || self.projections.roi.annual_revenue != calc.annual_revenue
            || (self.projections.roi.roi_multiple - calc.roi_multiple).abs() > 0.05;

        self.projections.month_six = month_six;
        self.projections.month_twelve = month_twelve;
        self.projections.roi.annual_investment = calc.annual_investment;
        self.projections.roi.annual_revenue = calc.annual_revenue;
        self.projections.roi.roi_multiple = calc.roi_multiple;
        if self.projections.roi.summary.trim().is_empty() {
            self.projections.roi.summary = format!(
                "{} invested per year returns {} in new revenue.",
                format_gbp(calc.annual_investment),
                format_gbp(calc.annual_revenue)
            );
        }
        self.simple_math = calc.simple_math_steps();

        for (package, tier) in self.packages.iter_mut().zip(PackageTier::ALL) {
            package.tier = Some(tier);
            package.monthly_price = Some(tier.monthly_price());
            package.recommended = tier == calc.tier;
            if package.name.trim().is_empty() {
                package.name = tier.display_name().to_string();
            }
        }
        drifted
    }
}

impl ConciseProposal {
    /// # Errors
    ///
    /// Returns the first field a renderer could not draw.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.cover_page.company_name, "coverPage.companyName")?;
        require_text(&self.introduction.headline, "introduction.headline")?;
        require_items(&self.competition.comparison_table, "competition.comparisonTable")?;
        require_items(&self.strategy.tactics, "strategy.tactics")?;
        require_items(&self.investment.deliverables, "investment.deliverables")?;
        if self.investment.price().is_none() {
            return Err(ValidationError::new("investment.monthlyPrice", "is missing"));
        }
        require_items(&self.investment.projected_results, "investment.projectedResults")?;
        require_items(&self.summary.next_steps, "summary.nextSteps")?;
        Ok(())
    }

    pub fn apply_projection(&mut self, calc: &ProjectionCalculation) -> bool {
        let rows = calc.projected_results_rows();
        let drifted = !self.investment.projected_results.is_empty()
            && self.investment.projected_results != rows;
        self.investment.projected_results = rows;
        self.investment.tier = Some(calc.tier);
        self.investment.monthly_price = Some(calc.monthly_investment);
        if self.investment.package_name.trim().is_empty() {
            self.investment.package_name = calc.tier.display_name().to_string();
        }
        if self.investment.roi_summary.trim().is_empty() {
            self.investment.roi_summary = format!(
                "{} new customers a month, {} in monthly revenue, a {:.1}x return on {} per month.",
                format_number(calc.monthly_customers),
                format_gbp(calc.monthly_revenue),
                calc.roi_multiple,
                format_gbp(calc.monthly_investment)
            );
        }
        drifted
    }
}

#[cfg(test)]
#[path = "proposal_test.rs"]
mod tests;
