//! FFprobe media information.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::FfmpegError;

/// Video file information.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frame rate (fps)
    pub fps: f64,
}

/// Audio file information.
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// Duration in seconds
    pub duration: f64,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a video file for duration, resolution, and frame rate.
pub async fn probe_video(path: impl AsRef<Path>) -> Result<VideoInfo, FfmpegError> {
    let probe = run_ffprobe(path.as_ref()).await?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| FfmpegError::InvalidMedia("No video stream found".to_string()))?;

    let duration = parse_duration(&probe.format)?;

    let fps = video_stream
        .avg_frame_rate
        .as_ref()
        .or(video_stream.r_frame_rate.as_ref())
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    let width = video_stream.width.unwrap_or(0);
    let height = video_stream.height.unwrap_or(0);
    if width == 0 || height == 0 {
        return Err(FfmpegError::InvalidMedia(
            "Video stream has no resolution".to_string(),
        ));
    }

    Ok(VideoInfo {
        duration,
        width,
        height,
        fps,
    })
}

/// Probe an audio file for its duration.
pub async fn probe_audio(path: impl AsRef<Path>) -> Result<AudioInfo, FfmpegError> {
    let probe = run_ffprobe(path.as_ref()).await?;

    if !probe.streams.iter().any(|s| s.codec_type == "audio") {
        return Err(FfmpegError::InvalidMedia(
            "No audio stream found".to_string(),
        ));
    }

    let duration = parse_duration(&probe.format)?;

    Ok(AudioInfo { duration })
}

async fn run_ffprobe(path: &Path) -> Result<FfprobeOutput, FfmpegError> {
    if !path.exists() {
        return Err(FfmpegError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| FfmpegError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(FfmpegError::failed(
            "FFprobe failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
            output.status.code(),
        ));
    }

    Ok(serde_json::from_slice(&output.stdout)?)
}

fn parse_duration(format: &FfprobeFormat) -> Result<f64, FfmpegError> {
    let duration = format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    if duration <= 0.0 {
        return Err(FfmpegError::InvalidMedia(
            "Media has no duration".to_string(),
        ));
    }

    Ok(duration)
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("30/0").is_none());
    }

    #[test]
    fn test_parse_duration_rejects_zero() {
        let format = FfprobeFormat {
            duration: Some("0.0".to_string()),
        };
        assert!(parse_duration(&format).is_err());

        let format = FfprobeFormat {
            duration: Some("42.5".to_string()),
        };
        assert!((parse_duration(&format).unwrap() - 42.5).abs() < 1e-9);
    }
}
