//! Shared data models for the StoryShorts compositor.
//!
//! This crate provides Serde-serializable types for:
//! - Background/music asset metadata
//! - Word timings and caption chunks
//! - Caption style variants and color jitter
//! - Fully resolved render plans
//! - Output and encoding configuration
//! - Jobs and batch outcomes

pub mod asset;
pub mod caption;
pub mod job;
pub mod output;
pub mod plan;
pub mod style;

// Re-export common types
pub use asset::{AssetId, BackgroundAsset, MusicTrack, MusicTrackId};
pub use caption::{CaptionChunk, CaptionWord};
pub use job::{JobId, JobOutcome, RenderJob};
pub use output::{EncodingConfig, OutputSpec, OUTPUT_FPS, OUTPUT_HEIGHT, OUTPUT_WIDTH};
pub use plan::{RenderPlan, SegmentPlan};
pub use style::{CaptionColor, CaptionFont, CaptionPosition, ColorJitter, StyleVariant};
