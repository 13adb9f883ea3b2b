//! Caption timeline building.
//!
//! Groups word timings into short display chunks and stitches their
//! intervals so the whole narration is covered without gaps or
//! overlaps. The timeline is restartable: rendering iterates it once
//! for the subtitle file and may iterate again for preview passes.

use shorts_models::{CaptionChunk, CaptionWord, StyleVariant};

/// Longest run of words shown together.
pub const MAX_WORDS_PER_CHUNK: usize = 3;

/// Text shown when no word timings are available.
pub const PLACEHOLDER_TEXT: &str = "...";

/// The caption chunks for one render plus the style they share.
#[derive(Debug, Clone)]
pub struct CaptionTimeline {
    chunks: Vec<CaptionChunk>,
    style: StyleVariant,
    narration_duration: f64,
}

impl CaptionTimeline {
    /// Partition words into chunks of 1..=3 words, closing a chunk at
    /// sentence-ending punctuation or at the word limit, whichever
    /// comes first. Chunk intervals are stitched to cover exactly
    /// `[0, narration_duration]`.
    ///
    /// An empty word list degrades to a single placeholder chunk
    /// spanning the whole narration; it never fails the job.
    pub fn build(
        words: &[CaptionWord],
        narration_duration: f64,
        style: StyleVariant,
    ) -> Self {
        let groups = group_words(words);

        let chunks = if groups.is_empty() {
            vec![CaptionChunk::new(PLACEHOLDER_TEXT, 0.0, narration_duration)]
        } else {
            stitch_chunks(&groups, narration_duration)
        };

        Self {
            chunks,
            style,
            narration_duration,
        }
    }

    pub fn chunks(&self) -> &[CaptionChunk] {
        &self.chunks
    }

    /// Restartable iteration over the chunks.
    pub fn iter(&self) -> impl Iterator<Item = &CaptionChunk> + Clone {
        self.chunks.iter()
    }

    pub fn style(&self) -> &StyleVariant {
        &self.style
    }

    pub fn narration_duration(&self) -> f64 {
        self.narration_duration
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Greedy grouping: a group closes at sentence-ending punctuation or
/// when it reaches [`MAX_WORDS_PER_CHUNK`] words.
fn group_words(words: &[CaptionWord]) -> Vec<Vec<&CaptionWord>> {
    let mut groups = Vec::new();
    let mut current: Vec<&CaptionWord> = Vec::new();

    for word in words {
        if word.text.trim().is_empty() {
            continue;
        }
        current.push(word);
        if word.ends_sentence() || current.len() >= MAX_WORDS_PER_CHUNK {
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Turn word groups into gapless chunks covering `[0, duration]`.
///
/// Interior boundaries sit at each following group's first-word start,
/// so a chunk stays visible until the next one appears.
fn stitch_chunks(groups: &[Vec<&CaptionWord>], narration_duration: f64) -> Vec<CaptionChunk> {
    let mut chunks = Vec::with_capacity(groups.len());
    let mut start = 0.0f64;

    for (i, group) in groups.iter().enumerate() {
        let end = match groups.get(i + 1) {
            Some(next) => next[0].start.clamp(start, narration_duration),
            None => narration_duration,
        };

        let text = group
            .iter()
            .map(|w| w.text.trim())
            .collect::<Vec<_>>()
            .join(" ");

        chunks.push(CaptionChunk::new(text, start, end));
        start = end;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(specs: &[(&str, f64, f64)]) -> Vec<CaptionWord> {
        specs
            .iter()
            .map(|(t, s, e)| CaptionWord::new(*t, *s, *e))
            .collect()
    }

    fn assert_gapless(timeline: &CaptionTimeline, duration: f64) {
        let chunks = timeline.chunks();
        assert!((chunks[0].start).abs() < 1e-9);
        assert!((chunks.last().unwrap().end - duration).abs() < 1e-9);
        for pair in chunks.windows(2) {
            assert!(
                (pair[0].end - pair[1].start).abs() < 1e-9,
                "gap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
        for chunk in chunks {
            assert!(chunk.end <= duration + 1e-9);
        }
    }

    #[test]
    fn test_three_word_limit() {
        let words = words(&[
            ("the", 0.0, 0.2),
            ("quick", 0.2, 0.4),
            ("brown", 0.4, 0.6),
            ("fox", 0.6, 0.8),
        ]);
        let timeline = CaptionTimeline::build(&words, 1.0, StyleVariant::default());
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.chunks()[0].text, "the quick brown");
        assert_eq!(timeline.chunks()[1].text, "fox");
        assert_gapless(&timeline, 1.0);
    }

    #[test]
    fn test_sentence_punctuation_forces_boundary() {
        let words = words(&[
            ("so", 0.0, 0.2),
            ("anyway.", 0.2, 0.5),
            ("then", 0.6, 0.8),
            ("it", 0.8, 1.0),
            ("happened!", 1.0, 1.4),
        ]);
        let timeline = CaptionTimeline::build(&words, 2.0, StyleVariant::default());
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.chunks()[0].text, "so anyway.");
        assert_eq!(timeline.chunks()[1].text, "then it happened!");
        // First chunk holds until the next one appears
        assert!((timeline.chunks()[0].end - 0.6).abs() < 1e-9);
        assert_gapless(&timeline, 2.0);
    }

    #[test]
    fn test_empty_words_placeholder() {
        let timeline = CaptionTimeline::build(&[], 30.0, StyleVariant::default());
        assert_eq!(timeline.len(), 1);
        let chunk = &timeline.chunks()[0];
        assert_eq!(chunk.text, PLACEHOLDER_TEXT);
        assert!((chunk.start).abs() < 1e-9);
        assert!((chunk.end - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_coverage_for_arbitrary_word_lists() {
        let cases: Vec<Vec<CaptionWord>> = vec![
            words(&[("one", 0.5, 1.0)]),
            words(&[("a", 0.0, 0.1), ("b.", 0.1, 0.2), ("c", 5.0, 6.0)]),
            (0..25)
                .map(|i| CaptionWord::new(format!("w{i}"), i as f64 * 0.3, i as f64 * 0.3 + 0.25))
                .collect(),
        ];
        for word_list in cases {
            let last_end = word_list.last().unwrap().end;
            let duration = last_end + 1.0;
            let timeline = CaptionTimeline::build(&word_list, duration, StyleVariant::default());
            assert_gapless(&timeline, duration);
        }
    }

    #[test]
    fn test_whitespace_words_skipped() {
        let words = words(&[("  ", 0.0, 0.1), ("hello", 0.1, 0.4)]);
        let timeline = CaptionTimeline::build(&words, 1.0, StyleVariant::default());
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.chunks()[0].text, "hello");
    }

    #[test]
    fn test_iteration_is_restartable() {
        let words = words(&[("a", 0.0, 0.2), ("b", 0.2, 0.4)]);
        let timeline = CaptionTimeline::build(&words, 1.0, StyleVariant::default());
        let first: Vec<_> = timeline.iter().collect();
        let second: Vec<_> = timeline.iter().collect();
        assert_eq!(first, second);
    }
}
