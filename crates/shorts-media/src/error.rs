//! Error types for the compositing pipeline.
//!
//! Catalog errors are fatal to a whole batch; segment, geometry, and
//! composite errors are scoped to a single job.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from spawning or running ffmpeg/ffprobe.
#[derive(Debug, Error)]
pub enum FfmpegError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    Failed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid media file: {0}")]
    InvalidMedia(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl FfmpegError {
    pub fn failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::Failed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }
}

/// Catalog-level errors. These abort the batch before any job starts.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("No usable asset found in {0}")]
    EmptyCatalog(PathBuf),

    #[error("Unreadable asset {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: FfmpegError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-job segment selection errors.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("Invalid target duration: {0}s")]
    InvalidDuration(f64),

    #[error("No usable asset after {attempts} selection attempts")]
    NoUsableAsset { attempts: u32 },
}

/// Per-job geometry errors.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Source resolution {width}x{height} too small for output frame")]
    DegenerateFrame { width: u32, height: u32 },
}

/// The compositing sub-stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeStage {
    /// Creating the scratch workspace
    Workspace,
    /// Writing the subtitle file
    Subtitles,
    /// The single-pass decode/filter/encode ffmpeg run
    Encode,
    /// Moving the finished file into the output location
    Publish,
}

impl CompositeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeStage::Workspace => "workspace",
            CompositeStage::Subtitles => "subtitles",
            CompositeStage::Encode => "encode",
            CompositeStage::Publish => "publish",
        }
    }
}

impl std::fmt::Display for CompositeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-job compositing error, tagged with the originating sub-stage.
#[derive(Debug, Error)]
#[error("Compositing failed at {stage} stage: {source}")]
pub struct CompositeError {
    pub stage: CompositeStage,
    #[source]
    pub source: FfmpegError,
}

impl CompositeError {
    pub fn workspace(source: impl Into<FfmpegError>) -> Self {
        Self {
            stage: CompositeStage::Workspace,
            source: source.into(),
        }
    }

    pub fn subtitles(source: impl Into<FfmpegError>) -> Self {
        Self {
            stage: CompositeStage::Subtitles,
            source: source.into(),
        }
    }

    pub fn encode(source: FfmpegError) -> Self {
        Self {
            stage: CompositeStage::Encode,
            source,
        }
    }

    pub fn publish(source: impl Into<FfmpegError>) -> Self {
        Self {
            stage: CompositeStage::Publish,
            source: source.into(),
        }
    }

    /// Whether the failure was a cancellation rather than a real error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.source, FfmpegError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tagging() {
        let err = CompositeError::encode(FfmpegError::Timeout(60));
        assert_eq!(err.stage, CompositeStage::Encode);
        assert!(err.to_string().contains("encode"));
        assert!(!err.is_cancelled());

        let err = CompositeError::encode(FfmpegError::Cancelled);
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_segment_error_display() {
        let err = SegmentError::NoUsableAsset { attempts: 3 };
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_unreadable_names_file() {
        let err = AssetError::Unreadable {
            path: PathBuf::from("/assets/broken.mp4"),
            source: FfmpegError::InvalidMedia("No video stream found".to_string()),
        };
        assert!(err.to_string().contains("broken.mp4"));
        assert!(err.to_string().contains("No video stream found"));
    }
}
