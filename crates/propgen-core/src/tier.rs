//! Package tiers and the request-level enums that select a generation path.
//!
//! [`PackageTier`] is the single source of truth for tier pricing, growth
//! multipliers and deliverable volumes. Prompts, projections and renderers
//! all read from here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageTier {
    Local,
    Regional,
    National,
}

impl PackageTier {
    pub const ALL: [PackageTier; 3] = [
        PackageTier::Local,
        PackageTier::Regional,
        PackageTier::National,
    ];

    /// Monthly retainer in whole pounds.
    #[must_use]
    pub fn monthly_price(self) -> u64 {
        match self {
            PackageTier::Local => 2_000,
            PackageTier::Regional => 3_000,
            PackageTier::National => 5_000,
        }
    }

    /// Twelve-month traffic multiplier applied by the projection calculator.
    #[must_use]
    pub fn growth_multiplier(self) -> f64 {
        match self {
            PackageTier::Local => 3.0,
            PackageTier::Regional => 5.0,
            PackageTier::National => 10.0,
        }
    }

    #[must_use]
    pub fn target_keywords(self) -> u32 {
        match self {
            PackageTier::Local => 15,
            PackageTier::Regional => 30,
            PackageTier::National => 60,
        }
    }

    #[must_use]
    pub fn articles_per_month(self) -> u32 {
        match self {
            PackageTier::Local => 4,
            PackageTier::Regional => 8,
            PackageTier::National => 16,
        }
    }

    /// Number of service keyword queries the external research agent issues.
    #[must_use]
    pub fn search_queries(self) -> usize {
        match self {
            PackageTier::Local => 3,
            PackageTier::Regional => 5,
            PackageTier::National => 8,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PackageTier::Local => "local",
            PackageTier::Regional => "regional",
            PackageTier::National => "national",
        }
    }

    /// Display name used in proposal copy ("Local SEO").
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            PackageTier::Local => "Local SEO",
            PackageTier::Regional => "Regional SEO",
            PackageTier::National => "National SEO",
        }
    }
}

impl std::fmt::Display for PackageTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(PackageTier::Local),
            "regional" => Ok(PackageTier::Regional),
            "national" => Ok(PackageTier::National),
            _ => Err(CoreError::UnknownTier(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalMode {
    #[default]
    Concise,
    Detailed,
}

impl ProposalMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProposalMode::Concise => "concise",
            ProposalMode::Detailed => "detailed",
        }
    }
}

impl FromStr for ProposalMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concise" => Ok(ProposalMode::Concise),
            "detailed" => Ok(ProposalMode::Detailed),
            _ => Err(CoreError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    #[default]
    Classic,
    Modern,
}

impl TemplateStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateStyle::Classic => "classic",
            TemplateStyle::Modern => "modern",
        }
    }
}

impl FromStr for TemplateStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(TemplateStyle::Classic),
            "modern" => Ok(TemplateStyle::Modern),
            _ => Err(CoreError::UnknownStyle(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Html,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Html => "text/html; charset=utf-8",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "html" => Ok(OutputFormat::Html),
            _ => Err(CoreError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_prices_are_fixed() {
        assert_eq!(PackageTier::Local.monthly_price(), 2_000);
        assert_eq!(PackageTier::Regional.monthly_price(), 3_000);
        assert_eq!(PackageTier::National.monthly_price(), 5_000);
    }

    #[test]
    fn tiers_scale_monotonically() {
        for pair in PackageTier::ALL.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            assert!(lo.monthly_price() < hi.monthly_price());
            assert!(lo.growth_multiplier() < hi.growth_multiplier());
            assert!(lo.target_keywords() < hi.target_keywords());
            assert!(lo.search_queries() < hi.search_queries());
        }
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("Regional".parse::<PackageTier>().unwrap(), PackageTier::Regional);
        assert_eq!(" national ".parse::<PackageTier>().unwrap(), PackageTier::National);
        assert!("global".parse::<PackageTier>().is_err());
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&PackageTier::Local).unwrap();
        assert_eq!(json, "\"local\"");
    }

    #[test]
    fn request_enums_parse() {
        assert_eq!("detailed".parse::<ProposalMode>().unwrap(), ProposalMode::Detailed);
        assert_eq!("MODERN".parse::<TemplateStyle>().unwrap(), TemplateStyle::Modern);
        assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert!("docx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_metadata() {
        assert_eq!(OutputFormat::Pdf.extension(), "pdf");
        assert_eq!(OutputFormat::Html.content_type(), "text/html; charset=utf-8");
    }
}
