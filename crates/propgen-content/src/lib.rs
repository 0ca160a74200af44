//! Proposal content generation.
//!
//! Both generators compute the projection first, hand its figures to the LLM
//! verbatim, then parse, sanitize, re-impose the figures and validate what
//! comes back. The result is a [`ProposalContent`] that every renderer can
//! draw.
//!
//! [`ProposalContent`]: propgen_core::ProposalContent

pub mod concise;
pub mod detailed;
mod error;
pub mod generator;
mod prompts;
pub mod reference;

pub use concise::ConciseGenerator;
pub use detailed::DetailedGenerator;
pub use error::ContentError;
pub use generator::{ContentGenerators, ContentRequest, GeneratedContent, ProposalGenerator};
pub use reference::ReferenceDocument;
