//! Transcoder - compresses a source video to VP9/Opus WebM through ffmpeg.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use reelpush_core::{Config, Result, TranscodeError};
use tokio::process::Command;

const OUTPUT_EXTENSION: &str = "webm";
const AUDIO_BITRATE: &str = "96k";
const THREADS: &str = "4";

#[derive(Debug, Clone)]
pub struct TranscoderConfig {
    pub ffmpeg_path: String,
    pub output_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl From<&Config> for TranscoderConfig {
    fn from(config: &Config) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            output_dir: config.output_dir.clone(),
            timeout: config.transcode_timeout,
        }
    }
}

/// A finished transcode.
#[derive(Debug, Clone)]
pub struct Transcoded {
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

pub struct Transcoder {
    config: TranscoderConfig,
}

impl Transcoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// `<output_dir>/<input stem>.webm`. Only the last extension is replaced.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let mut name = input
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "output".into());
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        self.config.output_dir.join(name)
    }

    /// Full ffmpeg argument list. Lower `quality` means better quality.
    pub fn build_args(&self, input: &Path, output: &Path, quality: u32) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-c:v".to_string(),
            "libvpx-vp9".to_string(),
            "-crf".to_string(),
            quality.to_string(),
            "-b:v".to_string(),
            "0".to_string(),
            "-b:a".to_string(),
            AUDIO_BITRATE.to_string(),
            "-c:a".to_string(),
            "libopus".to_string(),
            "-threads".to_string(),
            THREADS.to_string(),
            "-row-mt".to_string(),
            "1".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-stats".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Compress `input` into the output directory.
    ///
    /// ffmpeg's own progress output goes straight to the terminal.
    #[tracing::instrument(skip(self, input), fields(input = %input.display()))]
    pub async fn compress(&self, input: &Path, quality: u32) -> Result<Transcoded> {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let output_path = self.output_path_for(input);
        let args = self.build_args(input, &output_path, quality);

        tracing::info!(
            output = %output_path.display(),
            ffmpeg = %self.config.ffmpeg_path,
            "Starting transcode"
        );

        let started = Instant::now();
        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(&self.config.ffmpeg_path, e))?;

        let status = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    child.kill().await.ok();
                    return Err(TranscodeError::TimedOut {
                        seconds: limit.as_secs(),
                    }
                    .into());
                }
            },
            None => child.wait().await?,
        };

        check_status(status)?;

        let elapsed = started.elapsed();
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "Transcode finished");

        Ok(Transcoded {
            output_path,
            elapsed,
        })
    }
}

fn spawn_error(binary: &str, err: io::Error) -> TranscodeError {
    if err.kind() == io::ErrorKind::NotFound {
        TranscodeError::BinaryNotFound {
            binary: binary.to_string(),
        }
    } else {
        TranscodeError::Spawn {
            binary: binary.to_string(),
            source: err,
        }
    }
}

fn check_status(status: ExitStatus) -> std::result::Result<(), TranscodeError> {
    if status.success() {
        Ok(())
    } else {
        Err(TranscodeError::Failed { status })
    }
}
