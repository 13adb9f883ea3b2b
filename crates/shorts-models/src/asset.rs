//! Background and music asset metadata.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifier for a background asset within one catalog snapshot.
///
/// Derived from the file stem so the same directory always yields the
/// same ids, which keeps render plans reproducible across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a music track within one catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct MusicTrackId(String);

impl MusicTrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MusicTrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cataloged background clip. Immutable once probed; replaced only by
/// a catalog rebuild.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackgroundAsset {
    pub id: AssetId,
    pub path: PathBuf,
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frame rate (fps)
    pub fps: f64,
}

impl BackgroundAsset {
    /// Aspect ratio as width / height.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// A cataloged background music track (audio-only).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MusicTrack {
    pub id: MusicTrackId,
    pub path: PathBuf,
    /// Duration in seconds
    pub duration: f64,
}
