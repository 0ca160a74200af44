use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Output failed PDF validation; never returned to a caller as a document.
    #[error("rendered PDF is invalid: {0}")]
    InvalidPdf(String),

    #[error("failed to launch browser '{binary}': {source}")]
    BrowserLaunch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("browser exited with {status}: {stderr}")]
    BrowserFailed { status: String, stderr: String },

    #[error("browser did not finish within {0} seconds")]
    BrowserTimeout(u64),

    #[error("render I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load testimonials from {path}: {reason}")]
    Testimonials { path: String, reason: String },
}

impl RenderError {
    /// Message safe to show an end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPdf(_) => {
                "The proposal document failed quality checks. Please try again.".to_string()
            }
            Self::BrowserLaunch { .. } | Self::BrowserFailed { .. } | Self::BrowserTimeout(_) => {
                "The PDF converter is unavailable. Try the HTML format or the classic template."
                    .to_string()
            }
            Self::Testimonials { .. } => {
                "The testimonials file is misconfigured. Contact an administrator.".to_string()
            }
            Self::Io(_) => "The proposal document could not be written. Please try again.".to_string(),
        }
    }
}
