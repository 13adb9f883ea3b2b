//! Batch job discovery.
//!
//! Each audio file in the narration directory becomes one render job.
//! Discovery is the only place the batch touches ffprobe; everything
//! downstream works from the captured duration.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use shorts_media::{probe_audio, AUDIO_EXTENSIONS};
use shorts_models::RenderJob;

use crate::error::{WorkerError, WorkerResult};
use crate::words::load_words;

/// Output filename for a narration track: `story_01.mp3` -> `story_01_short.mp4`.
pub fn output_path(output_dir: &Path, narration: &Path) -> PathBuf {
    let stem = narration
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{stem}_short.mp4"))
}

/// Scan the narration directory and build the batch.
///
/// Files are visited in name order so job indices (and therefore
/// per-job seeds) are stable across runs over the same directory.
/// Narration files that fail probing are skipped with a warning
/// rather than aborting the batch.
pub async fn discover_jobs(narration_dir: &Path, output_dir: &Path) -> WorkerResult<Vec<RenderJob>> {
    if !narration_dir.is_dir() {
        return Err(WorkerError::config(format!(
            "Narration directory not found: {}",
            narration_dir.display()
        )));
    }

    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(narration_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut jobs = Vec::with_capacity(paths.len());
    for path in paths {
        let info = match probe_audio(&path).await {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    narration = %path.display(),
                    error = %e,
                    "Skipping unreadable narration file"
                );
                continue;
            }
        };

        let index = jobs.len() as u64;
        jobs.push(job_for_narration(index, &path, info.duration, output_dir).await);
    }

    Ok(jobs)
}

/// Build one job from a probed narration file.
///
/// Sidecar problems (missing or malformed) degrade to an empty word
/// list, so one bad timestamp file never takes down the batch or its
/// sibling jobs.
async fn job_for_narration(
    index: u64,
    narration: &Path,
    duration: f64,
    output_dir: &Path,
) -> RenderJob {
    let words = match load_words(narration).await {
        Ok(words) => words,
        Err(e) => {
            warn!(
                narration = %narration.display(),
                error = %e,
                "Unreadable word-timing sidecar; captions will use placeholder text"
            );
            Vec::new()
        }
    };

    let output = output_path(output_dir, narration);
    debug!(
        narration = %narration.display(),
        duration,
        words = words.len(),
        "Discovered job"
    );

    RenderJob::new(index, narration, duration, words, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_naming() {
        assert_eq!(
            output_path(Path::new("/out"), Path::new("/audio/story_01.mp3")),
            PathBuf::from("/out/story_01_short.mp4")
        );
    }

    #[tokio::test]
    async fn test_missing_narration_dir_is_config_error() {
        let result = discover_jobs(Path::new("/nonexistent/audio"), Path::new("/out")).await;
        assert!(matches!(result, Err(WorkerError::Config(_))));
    }

    #[tokio::test]
    async fn test_malformed_sidecar_does_not_poison_siblings() {
        let dir = TempDir::new().unwrap();
        let bad_narration = dir.path().join("story_01.mp3");
        let good_narration = dir.path().join("story_02.mp3");
        tokio::fs::write(&bad_narration, b"stub").await.unwrap();
        tokio::fs::write(&good_narration, b"stub").await.unwrap();
        tokio::fs::write(dir.path().join("story_01.words.json"), b"{not valid json")
            .await
            .unwrap();
        tokio::fs::write(
            dir.path().join("story_02.words.json"),
            r#"{"words":[{"text":"hello","start":0.0,"end":0.4}]}"#,
        )
        .await
        .unwrap();

        let bad = job_for_narration(0, &bad_narration, 45.0, Path::new("/out")).await;
        let good = job_for_narration(1, &good_narration, 45.0, Path::new("/out")).await;

        // The bad sidecar degrades to placeholder captions instead of
        // erroring; the sibling keeps its words.
        assert!(bad.words.is_empty());
        assert_eq!(bad.output_path, PathBuf::from("/out/story_01_short.mp4"));
        assert_eq!(good.words.len(), 1);
    }
}
