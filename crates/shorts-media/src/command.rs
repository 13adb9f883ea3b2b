//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::FfmpegError;

/// One input file with its preceding arguments (e.g. `-ss`, `-t`,
/// `-stream_loop`).
#[derive(Debug, Clone)]
struct FfmpegInput {
    args: Vec<String>,
    path: PathBuf,
}

/// Builder for multi-input FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<FfmpegInput>,
    output: PathBuf,
    output_args: Vec<String>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command producing `output`.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input file with no preceding arguments.
    pub fn input(self, path: impl AsRef<Path>) -> Self {
        self.input_with_args::<[&str; 0], &str>([], path)
    }

    /// Add an input file preceded by the given arguments.
    pub fn input_with_args<I, S>(mut self, args: I, path: impl AsRef<Path>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.push(FfmpegInput {
            args: args.into_iter().map(Into::into).collect(),
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    /// Add an output argument (after all inputs).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set filter complex.
    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Map a stream or filter label into the output.
    pub fn map(self, selector: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(selector)
    }

    /// Limit output duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        for input in &self.inputs {
            args.extend(input.args.clone());
            args.push("-i".to_string());
            args.push(input.path.to_string_lossy().to_string());
        }

        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with timeout and cancellation.
#[derive(Default)]
pub struct FfmpegRunner {
    cancel_rx: Option<watch::Receiver<bool>>,
    timeout_secs: Option<u64>,
}

impl FfmpegRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cancellation signal. When the flag flips to true the child
    /// process is killed and the run fails with `Cancelled`.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command to completion.
    pub async fn run(&self, cmd: &FfmpegCommand) -> Result<(), FfmpegError> {
        which::which("ffmpeg").map_err(|_| FfmpegError::FfmpegNotFound)?;

        if let Some(rx) = &self.cancel_rx {
            if *rx.borrow() {
                return Err(FfmpegError::Cancelled);
            }
        }

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stderr = child.stderr.take();
        let stderr_handle = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(ref mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buf).await;
            }
            buf
        });

        let status = self.wait_for_completion(&mut child).await?;
        let stderr = stderr_handle.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(FfmpegError::failed(
                "FFmpeg exited with non-zero status",
                Some(stderr),
                status.code(),
            ))
        }
    }

    /// Wait for the child, honoring cancellation and timeout.
    async fn wait_for_completion(
        &self,
        child: &mut Child,
    ) -> Result<std::process::ExitStatus, FfmpegError> {
        let mut cancel_rx = self.cancel_rx.clone();
        let timeout = self
            .timeout_secs
            .map(std::time::Duration::from_secs)
            .unwrap_or(std::time::Duration::MAX);
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                status = child.wait() => {
                    return Ok(status?);
                }
                _ = &mut deadline => {
                    warn!(
                        "FFmpeg timed out after {} seconds, killing process",
                        self.timeout_secs.unwrap_or(0)
                    );
                    let _ = child.kill().await;
                    return Err(FfmpegError::Timeout(self.timeout_secs.unwrap_or(0)));
                }
                changed = async {
                    match cancel_rx.as_mut() {
                        Some(rx) => rx.changed().await.map(|_| *rx.borrow()),
                        // No cancel channel: park this branch forever
                        None => std::future::pending().await,
                    }
                } => {
                    if matches!(changed, Ok(true) | Err(_)) {
                        info!("FFmpeg cancelled, killing process");
                        let _ = child.kill().await;
                        return Err(FfmpegError::Cancelled);
                    }
                }
            }
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> Result<PathBuf, FfmpegError> {
    which::which("ffmpeg").map_err(|_| FfmpegError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> Result<PathBuf, FfmpegError> {
    which::which("ffprobe").map_err(|_| FfmpegError::FfprobeNotFound)
}
