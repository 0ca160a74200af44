//! Presentation helpers shared by every template family.

use serde::{Deserialize, Serialize};

use propgen_core::proposal::{ComparisonRow, PackageOption};
use propgen_core::research::DiscoveredCompetitor;
use propgen_core::text::{format_gbp, format_number};
use propgen_core::ResearchResult;

const MAX_FALLBACK_COMPETITORS: usize = 5;

/// Per-document details that are not part of the generated content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub agency_name: String,
    pub proposal_number: Option<String>,
    pub date_label: String,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

/// Video testimonial shown in the modern template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub client: String,
    pub quote: String,
    /// Embeddable video URL (`https://www.youtube.com/embed/…`).
    pub video_url: String,
}

impl RenderContext {
    #[must_use]
    pub fn new(agency_name: &str, date_label: &str) -> Self {
        Self {
            agency_name: agency_name.to_string(),
            proposal_number: None,
            date_label: date_label.to_string(),
            testimonials: Vec::new(),
        }
    }

    /// "PROP-2026-00042 · 16 October 2026", or just the date.
    #[must_use]
    pub fn reference_line(&self) -> String {
        match &self.proposal_number {
            Some(n) => format!("{n} · {}", self.date_label),
            None => self.date_label.clone(),
        }
    }
}

#[must_use]
pub fn opt_number(value: Option<u64>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_number)
}

#[must_use]
pub fn package_price(package: &PackageOption) -> String {
    package
        .price()
        .map_or_else(|| "On request".to_string(), |p| format!("{}/month", format_gbp(p)))
}

fn discovered(research: Option<&ResearchResult>) -> &[DiscoveredCompetitor] {
    research
        .and_then(|r| r.enhanced_research.as_ref())
        .map_or(&[][..], |e| e.competitors.as_slice())
}

/// Competitor display name, with the real ranking domain appended when the
/// LLM's name matches a competitor seen in search results.
#[must_use]
pub fn competitor_label(row: &ComparisonRow, research: Option<&ResearchResult>) -> String {
    let name = row.name.trim();
    let matched = discovered(research).iter().find(|c| {
        c.name.eq_ignore_ascii_case(name) || c.domain.eq_ignore_ascii_case(name)
    });
    match matched {
        Some(c) if !c.domain.eq_ignore_ascii_case(name) => format!("{name} ({})", c.domain),
        _ => name.to_string(),
    }
}

/// The comparison table to draw: the content's rows, or rows built from
/// research when the content has none.
#[must_use]
pub fn comparison_rows(rows: &[ComparisonRow], research: Option<&ResearchResult>) -> Vec<ComparisonRow> {
    if !rows.is_empty() {
        return rows.to_vec();
    }
    let Some(research) = research else {
        return Vec::new();
    };
    research
        .competitor_names(MAX_FALLBACK_COMPETITORS)
        .into_iter()
        .map(|name| {
            let traffic = research
                .competitor_analysis
                .top_competitors
                .iter()
                .find(|c| c.name == name)
                .and_then(|c| c.estimated_traffic);
            ComparisonRow {
                name,
                monthly_traffic: traffic,
                ..ComparisonRow::default()
            }
        })
        .collect()
}
