//! Progress events streamed to the client while a proposal is generated.

use serde::{Serialize, Serializer};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Researching,
    GeneratingContent,
    Rendering,
    Persisting,
    Complete,
    Failed,
}

impl Stage {
    /// Percentage reported when the stage begins.
    #[must_use]
    pub fn progress(self) -> u8 {
        match self {
            Stage::Validating => 5,
            Stage::Researching => 15,
            Stage::GeneratingContent => 45,
            Stage::Rendering => 75,
            Stage::Persisting => 90,
            Stage::Complete | Stage::Failed => 100,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::Researching => "researching",
            Stage::GeneratingContent => "generating_content",
            Stage::Rendering => "rendering",
            Stage::Persisting => "persisting",
            Stage::Complete => "complete",
            Stage::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub total_duration_seconds: f64,
    pub total_tokens_used: u64,
    /// GBP, 4 dp.
    pub total_cost: f64,
}

/// One `data:` line of the progress stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProgressEvent {
    Stage {
        stage: Stage,
        progress: u8,
    },
    #[serde(rename_all = "camelCase")]
    Complete {
        #[serde(serialize_with = "always_true")]
        complete: (),
        proposal_number: String,
        pdf_url: String,
        metadata: RunMetadata,
    },
    Failed {
        #[serde(serialize_with = "always_true")]
        error: (),
        message: String,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn always_true<S: Serializer>(_: &(), serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(true)
}

impl ProgressEvent {
    #[must_use]
    pub fn stage(stage: Stage) -> Self {
        Self::Stage {
            stage,
            progress: stage.progress(),
        }
    }

    #[must_use]
    pub fn complete(proposal_number: String, pdf_url: String, metadata: RunMetadata) -> Self {
        Self::Complete {
            complete: (),
            proposal_number,
            pdf_url,
            metadata,
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            error: (),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Stage { .. })
    }
}

/// Sending half of a run's progress stream.
pub type ProgressSender = mpsc::Sender<ProgressEvent>;

/// Bounded channel sized for one run's events.
#[must_use]
pub fn progress_channel() -> (ProgressSender, mpsc::Receiver<ProgressEvent>) {
    mpsc::channel(16)
}
