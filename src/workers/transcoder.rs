use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::config::settings::FfmpegSettings;
use crate::error::DeriveError;
use crate::modules::compressor::deriver::ArtifactDeriver;

// Keep only the tail of stderr, ffmpeg prints its banner first.
const STDERR_TAIL: usize = 4096;

/// Runs the `ffmpeg` binary as a subprocess.
#[derive(Clone, Debug)]
pub struct FfmpegDeriver {
    settings: FfmpegSettings,
}

impl FfmpegDeriver {
    pub fn new(settings: FfmpegSettings) -> Self {
        Self { settings }
    }

    pub fn video_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input.into(),
            "-vf".into(),
            format!(
                "scale={}:{}",
                self.settings.target_width, self.settings.target_height
            )
            .into(),
            output.into(),
        ]
    }

    pub fn thumbnail_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input.into(),
            "-ss".into(),
            format_offset(self.settings.thumbnail_offset).into(),
            "-vframes".into(),
            "1".into(),
            output.into(),
        ]
    }

    async fn run(&self, args: Vec<OsString>, output: &Path) -> Result<(), DeriveError> {
        let mut cmd = Command::new(&self.settings.binary);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(?cmd, "Executing ffmpeg");

        let result = tokio::time::timeout(self.settings.timeout, cmd.output())
            .await
            .map_err(|_| {
                error!(timeout = ?self.settings.timeout, output = %output.display(), "ffmpeg timed out");
                DeriveError::Timeout(self.settings.timeout)
            })?;

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DeriveError::ToolNotFound(self.settings.binary.clone()));
            }
            Err(e) => return Err(DeriveError::Io(e)),
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let stderr = tail(stderr.trim(), STDERR_TAIL).to_string();
            error!(status = %out.status, %stderr, "ffmpeg failed");
            return Err(DeriveError::Failed {
                exit_code: out.status.code(),
                stderr,
            });
        }

        // ffmpeg exits 0 when seeking past the end of a short source
        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => {}
            _ => return Err(DeriveError::MissingOutput(output.to_path_buf())),
        }

        info!(output = %output.display(), "🎥 ffmpeg finished");
        Ok(())
    }
}

#[async_trait]
impl ArtifactDeriver for FfmpegDeriver {
    async fn derive_video(&self, input: &Path, output: &Path) -> Result<(), DeriveError> {
        self.run(self.video_args(input, output), output).await
    }

    async fn derive_thumbnail(&self, input: &Path, output: &Path) -> Result<(), DeriveError> {
        self.run(self.thumbnail_args(input, output), output).await
    }
}

/// `HH:MM:SS` seek position.
pub fn format_offset(offset: Duration) -> String {
    let secs = offset.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
