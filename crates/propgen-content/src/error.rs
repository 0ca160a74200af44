use propgen_core::ValidationError;
use propgen_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The JSON parsed but does not fit the content schema.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to read reference document {path}: {source}")]
    ReferenceDocument {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// Message safe to show an end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Llm(e) => e.user_message(),
            Self::Deserialize { .. } | Self::Validation(_) => {
                "The AI produced an incomplete proposal. Please try again.".to_string()
            }
            Self::ReferenceDocument { .. } => {
                "The agency reference document could not be loaded. Please contact an administrator."
                    .to_string()
            }
        }
    }
}
