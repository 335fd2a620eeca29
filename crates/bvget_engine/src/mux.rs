use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Error)]
pub enum MuxError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {}{}", describe_code(.code), describe_tail(.stderr_tail))]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr_tail: String,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn describe_tail(tail: &str) -> String {
    if tail.is_empty() {
        String::new()
    } else {
        format!(": {tail}")
    }
}

/// Combines a video-only and an audio-only file into one container.
#[async_trait::async_trait]
pub trait Muxer: Send + Sync {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError>;
}

/// Runs ffmpeg: video copied as-is, audio re-encoded, output overwritten.
#[derive(Debug, Clone)]
pub struct FfmpegMuxer {
    program: PathBuf,
    audio_codec: String,
}

impl FfmpegMuxer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            audio_codec: "aac".to_string(),
        }
    }

    pub fn with_audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.audio_codec = codec.into();
        self
    }

    pub fn args(&self, video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(video.into());
        args.push("-i".into());
        args.push(audio.into());
        let codecs = ["-c:v", "copy", "-c:a", self.audio_codec.as_str()];
        for flag in codecs.into_iter().chain(["-strict", "experimental", "-y"]) {
            args.push(flag.into());
        }
        args.push(output.into());
        args
    }
}

impl Default for FfmpegMuxer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait::async_trait]
impl Muxer for FfmpegMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError> {
        let program = self.program.display().to_string();
        let result = Command::new(&self.program)
            .args(self.args(video, audio, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| MuxError::Launch {
                program: program.clone(),
                source,
            })?;

        if result.status.success() {
            return Ok(());
        }
        Err(MuxError::ExitStatus {
            program,
            code: result.status.code(),
            stderr_tail: stderr_tail(&result.stderr),
        })
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
