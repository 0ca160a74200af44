//! Shared domain types and pure logic for the proposal-generation pipeline.
//!
//! Everything in this crate is I/O-free apart from configuration loading and
//! the optional industry-map override file: pricing tiers, the projection
//! calculator, industry keyword mapping, prompt/content sanitization, the
//! research and proposal-content data model, and the retry policy shared by
//! every outbound HTTP client.

mod app_config;
mod lenient;
pub mod config;
pub mod industry;
pub mod projection;
pub mod proposal;
pub mod research;
pub mod retry;
pub mod text;
pub mod tier;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use industry::{services_for_industry, IndustryMap, IndustryServices};
pub use projection::{calculate_projections, ConversionOverrides, ConversionRates, ProjectionCalculation};
pub use proposal::{ConciseProposal, DetailedProposal, ProposalContent, ValidationError};
pub use research::{EnhancedResearch, ResearchRequest, ResearchResult};
pub use retry::{RetryPolicy, Retryable};
pub use tier::{OutputFormat, PackageTier, ProposalMode, TemplateStyle};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read industry map {path}: {source}")]
    IndustryMapIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse industry map: {0}")]
    IndustryMapParse(#[from] serde_yaml::Error),

    #[error("industry map validation failed: {0}")]
    IndustryMapValidation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown package tier: {0}")]
    UnknownTier(String),

    #[error("unknown proposal mode: {0}")]
    UnknownMode(String),

    #[error("unknown template style: {0}")]
    UnknownStyle(String),

    #[error("unknown output format: {0}")]
    UnknownFormat(String),
}
