//! Seeded randomization engine.
//!
//! Every non-deterministic choice in a render (asset pick, segment
//! offset, caption style, color jitter, overlay, music track) is drawn
//! from one per-job engine, so a run is fully reproducible given the
//! seed. The non-randomized mode is the same engine in degenerate form,
//! returning fixed midpoint/default values, not a separate code path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shorts_models::{
    CaptionColor, CaptionFont, CaptionPosition, ColorJitter, StyleVariant,
};

/// Probability that a render gets the vignette overlay.
pub const OVERLAY_PROBABILITY: f64 = 0.35;

/// Caption size jitter: base 60 px varied by up to ±10 px, expressed as
/// a scale factor.
pub const SIZE_SCALE_JITTER: f64 = 10.0 / 60.0;

/// Source of every random choice made while building one render plan.
#[derive(Debug)]
pub enum RandomizationEngine {
    /// Seeded pseudorandom stream.
    Seeded(StdRng),
    /// Degenerate engine for the non-randomized mode.
    Fixed,
}

impl RandomizationEngine {
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(StdRng::seed_from_u64(seed))
    }

    pub fn fixed() -> Self {
        Self::Fixed
    }

    /// Engine for one job within a batch. Jobs are seeded independently
    /// so they stay deterministic without cross-job coupling.
    pub fn for_job(base_seed: u64, job_index: u64, randomize: bool) -> Self {
        if randomize {
            Self::seeded(base_seed ^ job_index)
        } else {
            Self::fixed()
        }
    }

    /// Pick an index into a non-empty candidate list.
    pub fn pick_index(&mut self, count: usize) -> usize {
        debug_assert!(count > 0, "pick_index requires a non-empty candidate list");
        match self {
            Self::Seeded(rng) => rng.random_range(0..count),
            Self::Fixed => count / 2,
        }
    }

    /// Offset fraction in [0, 1) used to place a segment within a
    /// longer asset.
    pub fn offset_fraction(&mut self) -> f64 {
        match self {
            Self::Seeded(rng) => rng.random_range(0.0..1.0),
            Self::Fixed => 0.5,
        }
    }

    /// Caption style for this render.
    pub fn style_variant(&mut self) -> StyleVariant {
        match self {
            Self::Seeded(rng) => StyleVariant {
                font: CaptionFont::ALL[rng.random_range(0..CaptionFont::ALL.len())],
                primary_color: CaptionColor::PRIMARY
                    [rng.random_range(0..CaptionColor::PRIMARY.len())],
                outline_color: CaptionColor::Black,
                position: CaptionPosition::ALL
                    [rng.random_range(0..CaptionPosition::ALL.len())],
                size_scale: 1.0 + rng.random_range(-SIZE_SCALE_JITTER..=SIZE_SCALE_JITTER),
            },
            Self::Fixed => StyleVariant::default(),
        }
    }

    /// Brightness/contrast jitter for this render.
    pub fn color_jitter(&mut self) -> ColorJitter {
        match self {
            Self::Seeded(rng) => ColorJitter::new(
                rng.random_range(-ColorJitter::MAX_MAGNITUDE..=ColorJitter::MAX_MAGNITUDE),
                rng.random_range(-ColorJitter::MAX_MAGNITUDE..=ColorJitter::MAX_MAGNITUDE),
            ),
            Self::Fixed => ColorJitter::default(),
        }
    }

    /// Whether the vignette overlay is applied.
    pub fn overlay_flag(&mut self) -> bool {
        match self {
            Self::Seeded(rng) => rng.random_bool(OVERLAY_PROBABILITY),
            Self::Fixed => false,
        }
    }
}
