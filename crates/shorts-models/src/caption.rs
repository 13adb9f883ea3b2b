//! Word timings and caption chunks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single word with its aligned time range, as produced by the
/// external speech aligner. Words arrive ordered, non-overlapping,
/// with monotonically increasing times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionWord {
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl CaptionWord {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Whether the word ends a sentence (forces a chunk boundary).
    pub fn ends_sentence(&self) -> bool {
        matches!(
            self.text.trim_end().chars().last(),
            Some('.') | Some('!') | Some('?')
        )
    }
}

/// A group of consecutive words displayed together with one time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionChunk {
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl CaptionChunk {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Display duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
