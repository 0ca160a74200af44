use propgen_core::Retryable;
use thiserror::Error;

/// Errors returned by the LLM gateway.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("LLM HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("LLM API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The provider's response envelope did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("LLM response contained no text content")]
    EmptyResponse,

    /// The model's text was not valid JSON.
    #[error("LLM response is not valid JSON ({source}); response began: {excerpt:?}")]
    InvalidJson {
        excerpt: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid LLM base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl Retryable for LlmError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Deserialize { .. }
            | Self::EmptyResponse
            | Self::InvalidJson { .. }
            | Self::InvalidBaseUrl(_) => false,
        }
    }
}

impl LlmError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message safe to show an end user; never includes provider response text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.status() {
            Some(401) => "The AI provider rejected our credentials. Please contact an administrator.".to_string(),
            Some(403) => "The AI provider denied permission for this request. Please contact an administrator.".to_string(),
            Some(429) => "The AI provider is rate limiting requests. Please try again in a few minutes.".to_string(),
            Some(400) => "The AI provider rejected the request as malformed. Please check the customer details and try again.".to_string(),
            Some(s) if s >= 500 => "The AI provider is temporarily unavailable. Please try again shortly.".to_string(),
            _ => match self {
                Self::InvalidJson { .. } | Self::EmptyResponse | Self::Deserialize { .. } => {
                    "The AI returned a response that could not be read. Please try again.".to_string()
                }
                _ => "Could not reach the AI provider. Please try again.".to_string(),
            },
        }
    }
}
