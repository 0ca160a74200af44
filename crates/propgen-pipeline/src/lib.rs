//! Proposal generation orchestrator.
//!
//! [`Orchestrator::run`] drives one request through validation, research,
//! content generation, rendering and persistence, streaming a
//! [`ProgressEvent`] per stage. Collaborators sit behind the traits in
//! [`ports`] and [`store`] so the whole workflow can run against fakes.

mod error;
pub mod orchestrator;
pub mod ports;
pub mod progress;
pub mod store;
mod wiring;

pub use error::PipelineError;
pub use orchestrator::{
    Collaborators, GenerationOutcome, GenerationRequest, Orchestrator, RunSettings,
};
pub use ports::{ContentStage, CustomerSource, ProposalSink, ResearchStage};
pub use progress::{progress_channel, ProgressEvent, ProgressSender, RunMetadata, Stage};
pub use store::{ArtifactStore, FsArtifactStore};
pub use wiring::{build_orchestrator, BuildError};
