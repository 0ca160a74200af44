use propgen_core::Retryable;
use propgen_llm::LlmError;
use thiserror::Error;

/// Errors returned by the search-results API client.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("search HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status from the search API.
    #[error("search API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// 2xx response carrying an `error` member.
    #[error("search API error: {0}")]
    Provider(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid search base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl Retryable for SearchError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Provider(_) | Self::Deserialize { .. } | Self::InvalidBaseUrl(_) => false,
        }
    }
}

impl SearchError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResearchError {
    /// The request has no company name; raised before any network call.
    #[error("company name is required for research")]
    MissingCompanyName,

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ResearchError {
    /// Message safe to show an end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCompanyName => {
                "The customer record has no company name. Add one and try again.".to_string()
            }
            Self::Llm(e) => e.user_message(),
            Self::Search(e) => match e.status() {
                Some(401 | 403) => {
                    "The search data provider rejected our credentials. Please contact an administrator."
                        .to_string()
                }
                Some(429) => {
                    "The search data provider is rate limiting requests. Please try again in a few minutes."
                        .to_string()
                }
                _ => "Search data could not be retrieved. Please try again shortly.".to_string(),
            },
        }
    }
}
