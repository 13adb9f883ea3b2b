//! Render plan assembly.
//!
//! Draws every choice for one job from its randomization engine, in a
//! fixed order (asset, offset, style, jitter, overlay, music), so the
//! resulting plan is fully determined by the seed, job index, and
//! catalog snapshot.

use tracing::warn;

use shorts_models::RenderPlan;

use crate::catalog::{AssetCatalog, MusicCatalog};
use crate::error::SegmentError;
use crate::rng::RandomizationEngine;
use crate::segment::select_segment;

/// Asset-level retries before a job gives up on segment selection.
pub const MAX_ASSET_RETRIES: u32 = 3;

/// Build the render plan for one job.
///
/// An asset whose file has gone missing since cataloging is dropped
/// from the candidate set and the pick is retried, at most
/// [`MAX_ASSET_RETRIES`] times.
pub fn build_render_plan(
    engine: &mut RandomizationEngine,
    catalog: &AssetCatalog,
    music: Option<&MusicCatalog>,
    needed_duration: f64,
) -> Result<RenderPlan, SegmentError> {
    if !needed_duration.is_finite() || needed_duration <= 0.0 {
        return Err(SegmentError::InvalidDuration(needed_duration));
    }

    let mut candidates: Vec<usize> = (0..catalog.len()).collect();
    let mut attempts = 0u32;

    let (asset, segment) = loop {
        if candidates.is_empty() || attempts >= MAX_ASSET_RETRIES {
            return Err(SegmentError::NoUsableAsset { attempts });
        }
        attempts += 1;

        let pick = engine.pick_index(candidates.len());
        let asset = &catalog.assets()[candidates[pick]];

        // The catalog snapshot can outlive the files on disk; verify the
        // pick is still openable before committing to it.
        if !asset.path.is_file() {
            warn!(
                asset_id = %asset.id,
                path = %asset.path.display(),
                "Chosen asset no longer readable, retrying selection"
            );
            candidates.remove(pick);
            continue;
        }

        let segment = select_segment(asset, needed_duration, engine.offset_fraction())?;
        break (asset, segment);
    };

    let style = engine.style_variant();
    let color_jitter = engine.color_jitter();
    let overlay_enabled = engine.overlay_flag();

    let music_track_id = music.filter(|m| !m.is_empty()).map(|m| {
        let pick = engine.pick_index(m.len());
        m.tracks()[pick].id.clone()
    });

    Ok(RenderPlan {
        asset_id: asset.id.clone(),
        segment,
        style,
        color_jitter,
        overlay_enabled,
        music_track_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::{AssetId, BackgroundAsset};
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn catalog_with_files(durations: &[f64]) -> (TempDir, AssetCatalog) {
        // Build a catalog by hand; the files only need to exist for the
        // openability check, not be real videos.
        let dir = TempDir::new().unwrap();
        let mut assets = Vec::new();
        for (i, duration) in durations.iter().enumerate() {
            let path = dir.path().join(format!("clip_{i:02}.mp4"));
            tokio::fs::write(&path, b"stub").await.unwrap();
            assets.push(BackgroundAsset {
                id: AssetId::new(format!("clip_{i:02}")),
                path,
                duration: *duration,
                width: 1920,
                height: 1080,
                fps: 30.0,
            });
        }
        let catalog = AssetCatalog::from_parts(dir.path().to_path_buf(), assets);
        (dir, catalog)
    }

    #[tokio::test]
    async fn test_plan_is_deterministic() {
        let (_dir, catalog) = catalog_with_files(&[3600.0, 120.0, 20.0]).await;

        let mut a = RandomizationEngine::seeded(42);
        let mut b = RandomizationEngine::seeded(42);

        let plan_a = build_render_plan(&mut a, &catalog, None, 45.0).unwrap();
        let plan_b = build_render_plan(&mut b, &catalog, None, 45.0).unwrap();
        assert_eq!(plan_a, plan_b);
    }

    #[tokio::test]
    async fn test_fixed_engine_plan() {
        let (_dir, catalog) = catalog_with_files(&[3600.0, 120.0, 20.0]).await;

        let mut engine = RandomizationEngine::fixed();
        let plan = build_render_plan(&mut engine, &catalog, None, 45.0).unwrap();

        // Midpoint asset, midpoint offset, defaults everywhere else.
        assert_eq!(plan.asset_id, AssetId::new("clip_01"));
        assert!((plan.segment.offset - (120.0 - 45.0) * 0.5).abs() < 1e-9);
        assert!(!plan.overlay_enabled);
        assert!(plan.color_jitter.is_identity());
        assert!(plan.music_track_id.is_none());
    }

    #[tokio::test]
    async fn test_missing_files_exhaust_retries() {
        let dir = TempDir::new().unwrap();
        let assets = vec![BackgroundAsset {
            id: AssetId::new("gone"),
            path: PathBuf::from(dir.path().join("gone.mp4")),
            duration: 60.0,
            width: 1920,
            height: 1080,
            fps: 30.0,
        }];
        let catalog = AssetCatalog::from_parts(dir.path().to_path_buf(), assets);

        let mut engine = RandomizationEngine::seeded(1);
        let result = build_render_plan(&mut engine, &catalog, None, 45.0);
        assert!(matches!(result, Err(SegmentError::NoUsableAsset { .. })));
    }

    #[tokio::test]
    async fn test_invalid_duration_rejected() {
        let (_dir, catalog) = catalog_with_files(&[60.0]).await;
        let mut engine = RandomizationEngine::seeded(1);
        assert!(matches!(
            build_render_plan(&mut engine, &catalog, None, 0.0),
            Err(SegmentError::InvalidDuration(_))
        ));
    }
}
