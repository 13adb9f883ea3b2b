//! Word-timing sidecar parsing.
//!
//! The external speech aligner writes one `<stem>.words.json` file per
//! narration track. A missing or empty sidecar is not an error: the
//! render degrades to a placeholder caption instead of failing the job.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use shorts_models::CaptionWord;

use crate::error::WorkerResult;

/// Aligner output format.
#[derive(Debug, Deserialize)]
struct AlignedTranscript {
    words: Vec<AlignedWord>,
}

#[derive(Debug, Deserialize)]
struct AlignedWord {
    #[serde(alias = "word")]
    text: String,
    start: f64,
    end: f64,
}

/// Sidecar path for a narration file: `story_01.mp3` -> `story_01.words.json`.
pub fn sidecar_path(narration: &Path) -> PathBuf {
    narration.with_extension("words.json")
}

/// Load word timings for a narration track.
///
/// Words with malformed timing (non-finite, or end before start) are
/// dropped; the caption builder copes with whatever remains.
pub async fn load_words(narration: &Path) -> WorkerResult<Vec<CaptionWord>> {
    let sidecar = sidecar_path(narration);
    if !sidecar.is_file() {
        warn!(
            narration = %narration.display(),
            "No word-timing sidecar found; captions will use placeholder text"
        );
        return Ok(Vec::new());
    }

    let raw = tokio::fs::read(&sidecar).await?;
    let transcript: AlignedTranscript = serde_json::from_slice(&raw)?;

    let words = transcript
        .words
        .into_iter()
        .filter(|w| w.start.is_finite() && w.end.is_finite() && w.end > w.start)
        .map(|w| CaptionWord::new(w.text, w.start.max(0.0), w.end))
        .collect();

    Ok(words)
}
