//! Fully resolved render plans.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetId, MusicTrackId};
use crate::style::{ColorJitter, StyleVariant};

/// Which sub-range of a background asset to use, and how often to
/// repeat it, so the extracted footage matches the narration length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SegmentPlan {
    /// Start offset into the asset, in seconds. Always 0 when looping.
    pub offset: f64,
    /// Duration of the extracted footage after looping/trimming, in seconds.
    pub duration: f64,
    /// Number of times the full asset is played (1 = single extraction).
    /// Loop seams are hard cuts; no crossfade is applied.
    pub loop_count: u32,
}

impl SegmentPlan {
    /// Whether the asset has to be repeated to reach the target duration.
    pub fn is_looped(&self) -> bool {
        self.loop_count > 1
    }
}

/// The complete, deterministic set of choices driving one compositing
/// job. Built once from a single RNG draw sequence and never mutated;
/// given the same seed, job index, and catalog snapshot, two runs
/// produce identical plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderPlan {
    pub asset_id: AssetId,
    pub segment: SegmentPlan,
    pub style: StyleVariant,
    pub color_jitter: ColorJitter,
    /// Apply the vignette overlay on top of the graded footage.
    pub overlay_enabled: bool,
    /// Ducked background music track, if a music catalog was provided.
    pub music_track_id: Option<MusicTrackId>,
}
