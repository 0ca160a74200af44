use propgen_content::ContentError;
use propgen_db::DbError;
use propgen_render::RenderError;
use propgen_research::ResearchError;
use thiserror::Error;

use crate::progress::Stage;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The trigger or the customer record cannot produce a proposal.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("customer {0} not found")]
    CustomerNotFound(i64),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Research(#[from] ResearchError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("artifact store error for {path}: {source}")]
    Artifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {context}: {source}")]
    Serialize {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("run exceeded its {secs}s deadline during {stage}")]
    DeadlineExceeded { stage: Stage, secs: u64 },

    /// The progress receiver went away; the client disconnected.
    #[error("run cancelled during {0}")]
    Cancelled(Stage),
}

impl PipelineError {
    /// Message carried by the `failed` progress event.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(reason) => format!("This proposal cannot be generated: {reason}."),
            Self::CustomerNotFound(_) => "The customer record could not be found.".to_string(),
            Self::Research(e) => e.user_message(),
            Self::Content(e) => e.user_message(),
            Self::Render(e) => e.user_message(),
            Self::Db(_) | Self::Artifact { .. } | Self::Serialize { .. } => {
                "The proposal could not be saved. Please try again.".to_string()
            }
            Self::DeadlineExceeded { .. } => {
                "Proposal generation took too long and was stopped. Please try again.".to_string()
            }
            Self::Cancelled(_) => "Proposal generation was cancelled.".to_string(),
        }
    }
}
