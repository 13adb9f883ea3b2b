//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Worker configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Directory with background video assets
    pub background_dir: PathBuf,
    /// Optional directory with background music tracks
    pub music_dir: Option<PathBuf>,
    /// Directory with narration audio (and word-timing sidecars)
    pub narration_dir: PathBuf,
    /// Final output directory for finished videos
    pub output_dir: PathBuf,
    /// Maximum concurrent jobs (capped at available CPU cores)
    pub max_concurrent_jobs: usize,
    /// Per-job encode timeout
    pub job_timeout: Duration,
    /// Base seed; each job derives its own stream from this
    pub base_seed: u64,
    /// Whether renders draw randomized choices (false = fixed defaults)
    pub randomize: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            background_dir: PathBuf::from("assets/gameplay"),
            music_dir: Some(PathBuf::from("assets/music")),
            narration_dir: PathBuf::from("output/audio"),
            output_dir: PathBuf::from("output/videos"),
            max_concurrent_jobs: default_parallelism(),
            job_timeout: Duration::from_secs(1800),
            base_seed: rand::random(),
            randomize: true,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            background_dir: std::env::var("SHORTS_BACKGROUND_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.background_dir),
            music_dir: match std::env::var("SHORTS_MUSIC_DIR") {
                Ok(v) if v.is_empty() => None,
                Ok(v) => Some(PathBuf::from(v)),
                Err(_) => defaults.music_dir,
            },
            narration_dir: std::env::var("SHORTS_NARRATION_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.narration_dir),
            output_dir: std::env::var("SHORTS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            max_concurrent_jobs: std::env::var("SHORTS_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|n: usize| n.clamp(1, default_parallelism()))
                .unwrap_or(defaults.max_concurrent_jobs),
            job_timeout: Duration::from_secs(
                std::env::var("SHORTS_JOB_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1800),
            ),
            base_seed: std::env::var("SHORTS_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.base_seed),
            randomize: std::env::var("SHORTS_RANDOMIZE")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}

/// Worker pool ceiling: one slot per available core.
fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
}
