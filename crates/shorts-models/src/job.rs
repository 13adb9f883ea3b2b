//! Job definitions for batch processing.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::caption::CaptionWord;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One narration track to be turned into one finished short.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderJob {
    /// Unique job ID
    pub id: JobId,

    /// Position of this job within the batch; combined with the base
    /// seed to derive the per-job RNG seed.
    pub index: u64,

    /// Narration audio file
    pub narration_path: PathBuf,

    /// Exact narration duration in seconds
    pub narration_duration: f64,

    /// Word timings from the external speech aligner; may be empty
    #[serde(default)]
    pub words: Vec<CaptionWord>,

    /// Final output location for the finished video
    pub output_path: PathBuf,

    /// When the job was created
    pub created_at: DateTime<Utc>,
}

impl RenderJob {
    pub fn new(
        index: u64,
        narration_path: impl Into<PathBuf>,
        narration_duration: f64,
        words: Vec<CaptionWord>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: JobId::new(),
            index,
            narration_path: narration_path.into(),
            narration_duration,
            words,
            output_path: output_path.into(),
            created_at: Utc::now(),
        }
    }
}

/// Terminal result of one job within a batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum JobOutcome {
    /// Job finished and its output was published.
    Completed {
        job_id: JobId,
        output_path: PathBuf,
    },
    /// Job failed; siblings in the batch are unaffected.
    Failed {
        job_id: JobId,
        /// Pipeline stage that failed (e.g., "segment_selection")
        stage: String,
        error: String,
    },
    /// Job was cancelled before completing.
    Cancelled { job_id: JobId },
}

impl JobOutcome {
    pub fn job_id(&self) -> &JobId {
        match self {
            JobOutcome::Completed { job_id, .. } => job_id,
            JobOutcome::Failed { job_id, .. } => job_id,
            JobOutcome::Cancelled { job_id } => job_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed { .. })
    }
}
