#![deny(unreachable_patterns)]
//! Segment selection and synchronized caption compositing.
//!
//! This crate provides:
//! - Background asset and music catalogs with ffprobe metadata
//! - A seeded randomization engine driving every per-render choice
//! - Segment selection (random offset or wrap-around looping)
//! - Aspect normalization to the 1080x1920 shorts frame
//! - Caption timeline building and ASS subtitle serialization
//! - Single-pass FFmpeg compositing with atomic output publishing

pub mod captions;
pub mod catalog;
pub mod command;
pub mod compose;
pub mod error;
pub mod fs_utils;
pub mod geometry;
pub mod planner;
pub mod probe;
pub mod rng;
pub mod segment;
pub mod subtitle;

pub use captions::{CaptionTimeline, MAX_WORDS_PER_CHUNK, PLACEHOLDER_TEXT};
pub use catalog::{AssetCatalog, MusicCatalog, AUDIO_EXTENSIONS, VIDEO_EXTENSIONS};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::{Compositor, MUSIC_GAIN};
pub use error::{
    AssetError, CompositeError, CompositeStage, FfmpegError, GeometryError, SegmentError,
};
pub use geometry::CropPlan;
pub use planner::{build_render_plan, MAX_ASSET_RETRIES};
pub use probe::{probe_audio, probe_video, AudioInfo, VideoInfo};
pub use rng::{RandomizationEngine, OVERLAY_PROBABILITY};
pub use segment::select_segment;
