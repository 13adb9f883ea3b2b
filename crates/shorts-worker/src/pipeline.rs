//! Per-job render pipeline.
//!
//! Stage order for one job: plan (asset pick + segment + style draws),
//! geometry normalization, caption timeline, composite. Cancellation is
//! checked at stage boundaries; an in-flight encode is killed by the
//! compositor itself.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

use shorts_media::{
    build_render_plan, geometry, AssetCatalog, CaptionTimeline, Compositor, MusicCatalog,
    RandomizationEngine,
};
use shorts_models::{EncodingConfig, OutputSpec, RenderJob};

use crate::logging::JobLogger;

/// Shared, read-only state every job in the batch renders against.
#[derive(Clone)]
pub struct PipelineContext {
    pub catalog: Arc<AssetCatalog>,
    pub music: Option<Arc<MusicCatalog>>,
    pub encoding: EncodingConfig,
    pub output_spec: OutputSpec,
    pub base_seed: u64,
    pub randomize: bool,
    pub job_timeout_secs: u64,
}

/// Why one job ended without output. Carried into the batch report;
/// never aborts sibling jobs.
#[derive(Debug, Clone)]
pub struct JobError {
    pub stage: String,
    pub error: String,
    pub cancelled: bool,
}

impl JobError {
    fn at(stage: &str, error: impl ToString) -> Self {
        Self {
            stage: stage.to_string(),
            error: error.to_string(),
            cancelled: false,
        }
    }

    fn cancelled(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            error: "cancelled".to_string(),
            cancelled: true,
        }
    }
}

/// Run one job end to end, publishing to its output path on success.
pub async fn run_job(
    ctx: &PipelineContext,
    job: &RenderJob,
    cancel_rx: watch::Receiver<bool>,
) -> Result<PathBuf, JobError> {
    let logger = JobLogger::new(&job.id);

    if *cancel_rx.borrow() {
        return Err(JobError::cancelled("segment_selection"));
    }

    logger.stage(
        "segment_selection",
        &format!(
            "Planning render for {} ({:.1}s)",
            job.narration_path.display(),
            job.narration_duration
        ),
    );

    let mut engine = RandomizationEngine::for_job(ctx.base_seed, job.index, ctx.randomize);
    let plan = build_render_plan(
        &mut engine,
        &ctx.catalog,
        ctx.music.as_deref(),
        job.narration_duration,
    )
    .map_err(|e| JobError::at("segment_selection", e))?;

    // The plan's asset came from this catalog moments ago; a miss here
    // means the snapshot itself is inconsistent.
    let asset = ctx
        .catalog
        .get(&plan.asset_id)
        .ok_or_else(|| JobError::at("segment_selection", "planned asset missing from catalog"))?;

    let crop = geometry::normalize(asset.width, asset.height, &ctx.output_spec)
        .map_err(|e| JobError::at("geometry", e))?;

    if *cancel_rx.borrow() {
        return Err(JobError::cancelled("captions"));
    }

    if job.words.is_empty() {
        logger.warning("captions", "No word timings; rendering placeholder caption");
    }
    let timeline = CaptionTimeline::build(&job.words, job.narration_duration, plan.style);
    logger.stage(
        "captions",
        &format!("Caption timeline built ({} chunks)", timeline.len()),
    );

    let music_track = match (&plan.music_track_id, &ctx.music) {
        (Some(id), Some(catalog)) => catalog.get(id),
        _ => None,
    };

    let compositor = Compositor::new(ctx.encoding.clone(), ctx.output_spec.clone())
        .with_timeout(ctx.job_timeout_secs)
        .with_cancel(cancel_rx);

    let output = compositor
        .render(
            &plan,
            asset,
            &crop,
            &timeline,
            &job.narration_path,
            music_track,
            &job.output_path,
        )
        .await
        .map_err(|e| {
            if e.is_cancelled() {
                JobError::cancelled(e.stage.as_str())
            } else {
                JobError::at(e.stage.as_str(), e)
            }
        })?;

    logger.completion(&format!("Published {}", output.display()));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_models::{AssetId, BackgroundAsset};
    use tempfile::TempDir;

    fn context(catalog: AssetCatalog) -> PipelineContext {
        PipelineContext {
            catalog: Arc::new(catalog),
            music: None,
            encoding: EncodingConfig::default(),
            output_spec: OutputSpec::default(),
            base_seed: 7,
            randomize: true,
            job_timeout_secs: 60,
        }
    }

    fn job(narration_duration: f64) -> RenderJob {
        RenderJob::new(
            0,
            "/audio/story.mp3",
            narration_duration,
            Vec::new(),
            "/out/story_short.mp4",
        )
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let dir = TempDir::new().unwrap();
        let catalog = AssetCatalog::from_parts(dir.path().to_path_buf(), Vec::new());
        let (tx, rx) = watch::channel(true);
        drop(tx);

        let err = run_job(&context(catalog), &job(45.0), rx).await.unwrap_err();
        assert!(err.cancelled);
    }

    #[tokio::test]
    async fn test_planning_failure_names_stage() {
        // Catalog entry points at a file that does not exist, so every
        // selection retry fails before ffmpeg is ever involved.
        let dir = TempDir::new().unwrap();
        let catalog = AssetCatalog::from_parts(
            dir.path().to_path_buf(),
            vec![BackgroundAsset {
                id: AssetId::new("gone"),
                path: dir.path().join("gone.mp4"),
                duration: 60.0,
                width: 1920,
                height: 1080,
                fps: 30.0,
            }],
        );
        let (_tx, rx) = watch::channel(false);

        let err = run_job(&context(catalog), &job(45.0), rx).await.unwrap_err();
        assert_eq!(err.stage, "segment_selection");
        assert!(!err.cancelled);
    }

    #[tokio::test]
    async fn test_degenerate_asset_fails_geometry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiny.mp4");
        tokio::fs::write(&path, b"stub").await.unwrap();
        let catalog = AssetCatalog::from_parts(
            dir.path().to_path_buf(),
            vec![BackgroundAsset {
                id: AssetId::new("tiny"),
                path,
                duration: 600.0,
                width: 640,
                height: 360,
                fps: 30.0,
            }],
        );
        let (_tx, rx) = watch::channel(false);

        let err = run_job(&context(catalog), &job(45.0), rx).await.unwrap_err();
        assert_eq!(err.stage, "geometry");
    }
}
