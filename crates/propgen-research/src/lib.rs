//! Research stage: real search-engine data plus LLM analysis.
//!
//! [`EnhancedResearchAgent`] turns a company's industry and location into
//! service + location queries, runs them concurrently against a
//! search-results API and distils keyword positions, competitors, location
//! opportunities and content gaps. [`CompanyResearchAgent`] feeds that, with
//! the company metadata, to the LLM gateway in research mode and parses the
//! structured answer.

pub mod company;
pub mod enhanced;
mod error;
mod prompts;
pub mod search;

pub use company::CompanyResearchAgent;
pub use enhanced::EnhancedResearchAgent;
pub use error::{ResearchError, SearchError};
pub use search::{OrganicResult, SearchClient, SearchConfig, SearchProvider, SearchQuery, SearchResults};
