//! Where rendered proposals are written and how they are addressed.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use propgen_core::AppConfig;

use crate::error::PipelineError;

/// Path-segment characters that must be escaped in artifact URLs.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Stores `bytes` under `filename` and returns its public URL.
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, PipelineError>;

    /// Removes a stored artifact; used to undo a write whose row insert failed.
    async fn delete(&self, filename: &str) -> Result<(), PipelineError>;
}

/// Artifacts as files under one directory, served at `{base}/artifacts/{file}`.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsArtifactStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(config.artifact_dir.clone(), &config.public_base_url)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn url_for(&self, filename: &str) -> String {
        format!(
            "{}/artifacts/{}",
            self.public_base_url,
            utf8_percent_encode(filename, SEGMENT)
        )
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, PipelineError> {
        let plain = !filename.is_empty()
            && !filename.starts_with('.')
            && !filename.contains(['/', '\\']);
        if !plain {
            return Err(PipelineError::Artifact {
                path: filename.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "artifact names must be plain file names",
                ),
            });
        }
        Ok(self.root.join(filename))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, PipelineError> {
        let path = self.path_for(filename)?;
        let io_err = |source| PipelineError::Artifact {
            path: path.display().to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.root).await.map_err(io_err)?;

        // Write then rename so a reader never sees a partial file.
        let partial = self.root.join(format!(".{filename}.partial"));
        tokio::fs::write(&partial, bytes).await.map_err(io_err)?;
        tokio::fs::rename(&partial, &path).await.map_err(io_err)?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact stored");
        Ok(self.url_for(filename))
    }

    async fn delete(&self, filename: &str) -> Result<(), PipelineError> {
        let path = self.path_for(filename)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PipelineError::Artifact {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}
