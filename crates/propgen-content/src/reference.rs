//! Lazily loaded static reference document (agency credentials, case
//! studies) embedded in content prompts.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ContentError;

/// Longest slice of the document placed in a prompt.
pub const MAX_PROMPT_CHARS: usize = 12_000;

/// Read-only after first load; shared by concurrent generation runs.
pub struct ReferenceDocument {
    source: Source,
    cache: RwLock<Option<Arc<str>>>,
}

enum Source {
    None,
    File(PathBuf),
    Inline(Arc<str>),
}

impl ReferenceDocument {
    /// No reference document; prompts omit the section.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            source: Source::None,
            cache: RwLock::new(None),
        }
    }

    /// Loaded from `path` on first use.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
            cache: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: Source::Inline(Arc::from(text.into())),
            cache: RwLock::new(None),
        }
    }

    /// The document text, reading the file on first call.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::ReferenceDocument`] if the file cannot be read.
    pub async fn get(&self) -> Result<Option<Arc<str>>, ContentError> {
        if matches!(self.source, Source::None) {
            return Ok(None);
        }
        if let Some(text) = self.cache.read().await.as_ref() {
            return Ok(Some(Arc::clone(text)));
        }

        let mut guard = self.cache.write().await;
        if let Some(text) = guard.as_ref() {
            return Ok(Some(Arc::clone(text)));
        }
        let loaded: Arc<str> = match &self.source {
            Source::None => return Ok(None),
            Source::Inline(text) => Arc::clone(text),
            Source::File(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    ContentError::ReferenceDocument {
                        path: path.display().to_string(),
                        source: e,
                    }
                })?;
                tracing::info!(path = %path.display(), chars = text.len(), "reference document loaded");
                Arc::from(text)
            }
        };
        *guard = Some(Arc::clone(&loaded));
        Ok(Some(loaded))
    }

    /// Drops the cached text so the next [`get`](Self::get) re-reads the source.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}
