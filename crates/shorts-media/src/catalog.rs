//! Background asset and music track catalogs.
//!
//! A catalog is built once by probing every candidate file in a
//! directory and is read-only afterwards, so it can be shared across
//! workers without locking. Re-scanning the same directory yields the
//! same snapshot.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use shorts_models::{AssetId, BackgroundAsset, MusicTrack, MusicTrackId};

use crate::error::AssetError;
use crate::probe::{probe_audio, probe_video};

/// Extensions considered background video candidates.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "webm"];

/// Extensions considered music track candidates.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "aac"];

/// Indexed background clips with probed metadata.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    directory: PathBuf,
    assets: Vec<BackgroundAsset>,
}

impl AssetCatalog {
    /// Scan a directory and probe every video candidate.
    ///
    /// Files that fail probing are skipped with a warning; the load only
    /// fails if the directory is missing or no valid asset remains.
    pub async fn load(directory: impl AsRef<Path>) -> Result<Self, AssetError> {
        let directory = directory.as_ref().to_path_buf();
        let candidates = list_candidates(&directory, VIDEO_EXTENSIONS).await?;

        let mut assets = Vec::with_capacity(candidates.len());
        for path in candidates {
            match probe_video(&path).await {
                Ok(info) => {
                    assets.push(BackgroundAsset {
                        id: AssetId::new(file_stem(&path)),
                        path,
                        duration: info.duration,
                        width: info.width,
                        height: info.height,
                        fps: info.fps,
                    });
                }
                Err(source) => {
                    let err = AssetError::Unreadable { path, source };
                    warn!(error = %err, "Skipping unreadable background asset");
                }
            }
        }

        if assets.is_empty() {
            return Err(AssetError::EmptyCatalog(directory));
        }

        info!(
            directory = %directory.display(),
            count = assets.len(),
            "Background asset catalog loaded"
        );

        Ok(Self { directory, assets })
    }

    /// Build a catalog from pre-probed assets (no filesystem scan).
    pub fn from_parts(directory: PathBuf, assets: Vec<BackgroundAsset>) -> Self {
        Self { directory, assets }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn assets(&self) -> &[BackgroundAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Look up an asset by id.
    pub fn get(&self, id: &AssetId) -> Option<&BackgroundAsset> {
        self.assets.iter().find(|a| &a.id == id)
    }
}

/// Indexed background music tracks (audio-only).
///
/// Unlike the asset catalog, an empty music directory is not an error;
/// renders simply run without music.
#[derive(Debug, Clone, Default)]
pub struct MusicCatalog {
    tracks: Vec<MusicTrack>,
}

impl MusicCatalog {
    /// Scan a directory and probe every audio candidate.
    pub async fn load(directory: impl AsRef<Path>) -> Result<Self, AssetError> {
        let directory = directory.as_ref();
        let candidates = list_candidates(directory, AUDIO_EXTENSIONS).await?;

        let mut tracks = Vec::with_capacity(candidates.len());
        for path in candidates {
            match probe_audio(&path).await {
                Ok(info) => {
                    tracks.push(MusicTrack {
                        id: MusicTrackId::new(file_stem(&path)),
                        path,
                        duration: info.duration,
                    });
                }
                Err(source) => {
                    let err = AssetError::Unreadable { path, source };
                    warn!(error = %err, "Skipping unreadable music track");
                }
            }
        }

        if tracks.is_empty() {
            warn!(
                directory = %directory.display(),
                "No usable music tracks found; rendering without music"
            );
        } else {
            info!(
                directory = %directory.display(),
                count = tracks.len(),
                "Music catalog loaded"
            );
        }

        Ok(Self { tracks })
    }

    pub fn tracks(&self) -> &[MusicTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, id: &MusicTrackId) -> Option<&MusicTrack> {
        self.tracks.iter().find(|t| &t.id == id)
    }
}

/// List files matching the extension filter, sorted by name.
///
/// Sorting makes the catalog snapshot deterministic, which keeps
/// seeded asset choices reproducible across runs.
async fn list_candidates(
    directory: &Path,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, AssetError> {
    if !directory.is_dir() {
        return Err(AssetError::DirectoryNotFound(directory.to_path_buf()));
    }

    let mut entries = tokio::fs::read_dir(directory).await?;
    let mut candidates = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && has_extension(&path, extensions) {
            candidates.push(path);
        }
    }

    candidates.sort();
    Ok(candidates)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a/clip.mp4"), VIDEO_EXTENSIONS));
        assert!(has_extension(Path::new("a/CLIP.MP4"), VIDEO_EXTENSIONS));
        assert!(!has_extension(Path::new("a/notes.txt"), VIDEO_EXTENSIONS));
        assert!(!has_extension(Path::new("a/noext"), VIDEO_EXTENSIONS));
    }

    #[tokio::test]
    async fn test_load_missing_directory() {
        let result = AssetCatalog::load("/nonexistent/assets").await;
        assert!(matches!(result, Err(AssetError::DirectoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_load_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = AssetCatalog::load(dir.path()).await;
        assert!(matches!(result, Err(AssetError::EmptyCatalog(_))));
    }

    #[tokio::test]
    async fn test_non_video_files_ignored() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("readme.txt"), b"not a video")
            .await
            .unwrap();
        let result = AssetCatalog::load(dir.path()).await;
        assert!(matches!(result, Err(AssetError::EmptyCatalog(_))));
    }

    #[tokio::test]
    async fn test_music_catalog_empty_is_ok() {
        let dir = TempDir::new().unwrap();
        let catalog = MusicCatalog::load(dir.path()).await.unwrap();
        assert!(catalog.is_empty());
    }
}
