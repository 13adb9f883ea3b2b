//! Final video compositing.
//!
//! One ffmpeg pass per job: extract (or loop) the chosen background
//! segment, normalize its geometry, grade it, burn in captions, mix
//! narration over ducked music, and encode. The result is written to a
//! scratch directory and moved into the output location only on
//! success, so a partial file never appears at the final path.

use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::info;

use shorts_models::{BackgroundAsset, EncodingConfig, MusicTrack, OutputSpec, RenderPlan};

use crate::captions::CaptionTimeline;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::CompositeError;
use crate::fs_utils::move_file;
use crate::geometry::{filter_steps, CropPlan};
use crate::subtitle::write_ass;

/// Music is mixed at this fraction of full scale so it never masks the
/// narration.
pub const MUSIC_GAIN: f64 = 0.05;

/// Vignette applied when the plan enables the overlay.
const VIGNETTE_FILTER: &str = "vignette=PI/5";

/// Renders one finished short from a fully resolved plan.
pub struct Compositor {
    encoding: EncodingConfig,
    spec: OutputSpec,
    timeout_secs: Option<u64>,
    cancel_rx: Option<watch::Receiver<bool>>,
}

impl Compositor {
    pub fn new(encoding: EncodingConfig, spec: OutputSpec) -> Self {
        Self {
            encoding,
            spec,
            timeout_secs: None,
            cancel_rx: None,
        }
    }

    /// Abort the encode if it runs longer than this.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Kill an in-flight encode when the flag flips to true.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Render the final video to `output`.
    ///
    /// The output duration equals the narration duration (within one
    /// frame); captions follow their chunk intervals exactly; color
    /// jitter is applied uniformly across all frames.
    pub async fn render(
        &self,
        plan: &RenderPlan,
        asset: &BackgroundAsset,
        crop: &CropPlan,
        timeline: &CaptionTimeline,
        narration: &Path,
        music: Option<&MusicTrack>,
        output: &Path,
    ) -> Result<PathBuf, CompositeError> {
        let scratch = tempfile::tempdir().map_err(CompositeError::workspace)?;

        let ass_path = scratch.path().join("captions.ass");
        write_ass(timeline, &ass_path)
            .await
            .map_err(CompositeError::subtitles)?;

        let temp_output = scratch.path().join("render.mp4");
        let cmd = self.build_command(plan, asset, crop, &ass_path, narration, music, &temp_output);

        let mut runner = FfmpegRunner::new();
        if let Some(secs) = self.timeout_secs {
            runner = runner.with_timeout(secs);
        }
        if let Some(rx) = &self.cancel_rx {
            runner = runner.with_cancel(rx.clone());
        }

        info!(
            asset_id = %plan.asset_id,
            duration = plan.segment.duration,
            loops = plan.segment.loop_count,
            music = music.is_some(),
            "Compositing final video"
        );

        runner.run(&cmd).await.map_err(CompositeError::encode)?;

        // Scratch dir is dropped (and cleaned) whether or not this
        // succeeds, so failures leave nothing at the output path.
        move_file(&temp_output, output)
            .await
            .map_err(CompositeError::publish)?;

        info!(output = %output.display(), "Video published");
        Ok(output.to_path_buf())
    }

    /// Assemble the single-pass ffmpeg invocation.
    fn build_command(
        &self,
        plan: &RenderPlan,
        asset: &BackgroundAsset,
        crop: &CropPlan,
        ass_path: &Path,
        narration: &Path,
        music: Option<&MusicTrack>,
        temp_output: &Path,
    ) -> FfmpegCommand {
        let segment = &plan.segment;

        // Short assets are replayed wrap-around via -stream_loop; long
        // assets get input-side seeking into their slack.
        let bg_args: Vec<String> = if segment.is_looped() {
            vec![
                "-stream_loop".to_string(),
                (segment.loop_count - 1).to_string(),
            ]
        } else {
            vec!["-ss".to_string(), format!("{:.3}", segment.offset)]
        };

        let graph = build_filter_graph(plan, crop, &self.spec, ass_path, music.is_some());

        let mut cmd = FfmpegCommand::new(temp_output)
            .input_with_args(bg_args, &asset.path)
            .input(narration);

        if let Some(track) = music {
            cmd = cmd.input(&track.path);
        }

        let audio_map = if music.is_some() { "[aout]" } else { "1:a" };

        cmd.filter_complex(graph)
            .map("[vout]")
            .map(audio_map)
            .duration(segment.duration)
            .output_args(self.encoding.to_ffmpeg_args())
            .output_args(["-pix_fmt", "yuv420p", "-movflags", "+faststart"])
    }
}

/// Build the filter graph: geometry, uniform color grade, optional
/// vignette, burned-in captions, and the narration/music mix.
fn build_filter_graph(
    plan: &RenderPlan,
    crop: &CropPlan,
    spec: &OutputSpec,
    ass_path: &Path,
    has_music: bool,
) -> String {
    let mut video_steps = vec![filter_steps(crop, spec)];

    if !plan.color_jitter.is_identity() {
        video_steps.push(format!(
            "eq=brightness={:.4}:contrast={:.4}",
            plan.color_jitter.brightness,
            1.0 + plan.color_jitter.contrast,
        ));
    }

    if plan.overlay_enabled {
        video_steps.push(VIGNETTE_FILTER.to_string());
    }

    video_steps.push(format!(
        "ass='{}'",
        escape_filter_path(&ass_path.to_string_lossy())
    ));

    let video_chain = format!("[0:v]{}[vout]", video_steps.join(","));

    if has_music {
        format!(
            "{video_chain};[2:a]volume={MUSIC_GAIN}[bgm];\
             [1:a][bgm]amix=inputs=2:duration=first:normalize=0[aout]"
        )
    } else {
        video_chain
    }
}

/// Escape a path for use inside a quoted filter argument.
fn escape_filter_path(path: &str) -> String {
    path.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}
