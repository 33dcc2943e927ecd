use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use reelpush_api_client::{FormUploader, WebflowClient};
use reelpush_core::{
    AssetService, Config, Error, ErrorMetadata, LogLevel, PollOutcome, Result, TranscodeError,
    UploadOutcome, UploadTarget,
};
use reelpush_processing::{SizeReport, Transcoder, TranscoderConfig};
use reelpush_services::{PipelineSettings, PollAttempt, UploadPipeline, UploadProgress, UploadReport};

const SEPARATOR: &str = "---------------------------------------------------";

#[derive(Parser, Debug)]
#[command(name = "reelpush", about = "Compress a video then upload it to Webflow")]
pub struct Cli {
    /// The video file to convert
    pub input_file: PathBuf,

    /// The CRF quality value, lower is better quality (`-crf N` also accepted)
    #[arg(short = 'c', long)]
    pub crf: u32,

    /// Upload without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Asset folder to upload into
    #[arg(long)]
    pub folder: Option<String>,

    /// Directory for the compressed output
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of asset list polls
    #[arg(long)]
    pub poll_attempts: Option<u32>,

    /// Seconds between asset list polls
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Kill ffmpeg after this many seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub transcode_timeout: Option<u64>,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(folder) = &self.folder {
            config.upload_folder_name = folder.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(attempts) = self.poll_attempts {
            config.poll_max_attempts = attempts;
        }
        if let Some(secs) = self.poll_interval {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.transcode_timeout {
            config.transcode_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
    }
}

/// Rewrite the single-dash `-crf` spelling to `--crf` so clap does not read it
/// as `-c rf`.
pub fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.strip_prefix("-crf") {
            Some("") => "--crf".to_string(),
            Some(rest) if rest.starts_with('=') => format!("--crf{}", rest),
            _ => arg,
        })
        .collect()
}

/// Run one compress-and-upload session and return the process exit code.
///
/// Configuration is loaded before anything else, then the input file is
/// checked. User-facing lines go to `output`, failures to `errors`.
pub async fn run<C, R, W, E>(
    cli: &Cli,
    load_config: C,
    input: &mut R,
    output: &mut W,
    errors: &mut E,
) -> u8
where
    C: FnOnce() -> Result<Config>,
    R: BufRead,
    W: Write,
    E: Write,
{
    match execute(cli, load_config, input, output).await {
        Ok(code) => code,
        Err(err) => report_failure(&err, errors),
    }
}

async fn execute<C, R, W>(
    cli: &Cli,
    load_config: C,
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<u8>
where
    C: FnOnce() -> Result<Config>,
    R: BufRead,
    W: Write,
{
    let mut config = load_config()?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    tracing::debug!(config = ?config, "Configuration loaded");

    if !cli.input_file.is_file() {
        writeln!(output, "Error: File '{}' not found.", cli.input_file.display())?;
        return Ok(1);
    }

    let transcoder = Transcoder::new(TranscoderConfig::from(&config));
    writeln!(
        output,
        "Compressing: {} -> {} (CRF {})...",
        cli.input_file.display(),
        transcoder.output_path_for(&cli.input_file).display(),
        cli.crf
    )?;
    let transcoded = transcoder.compress(&cli.input_file, cli.crf).await?;
    writeln!(
        output,
        "Compression finished in {:.2}s",
        transcoded.elapsed.as_secs_f64()
    )?;

    let sizes = SizeReport::from_paths(&cli.input_file, &transcoded.output_path)
        .await
        .context("Failed to read file sizes")?;
    writeln!(output, "\n{}", sizes)?;

    let client = WebflowClient::from_config(&config)?;
    let uploader = FormUploader::new(config.http_timeout)?;
    let pipeline = UploadPipeline::new(client, uploader, PipelineSettings::from(&config));

    let report = upload_if_confirmed(
        &pipeline,
        &transcoded.output_path,
        cli.yes,
        input,
        output,
        &ConsoleProgress,
    )
    .await?;

    let Some(report) = report else {
        return Ok(0);
    };
    print_report(output, &report)?;

    match report.into_result() {
        Ok(_) => Ok(0),
        Err(err) => {
            log_error(&err);
            Ok(err.exit_code() as u8)
        }
    }
}

/// Print a failed run and map it to an exit code.
pub fn report_failure<E: Write>(err: &anyhow::Error, errors: &mut E) -> u8 {
    let Some(error) = err.downcast_ref::<Error>() else {
        writeln!(errors, "Error: {:#}", err).ok();
        return 1;
    };

    match error {
        Error::ExternalTool(TranscodeError::BinaryNotFound { .. }) => {
            writeln!(errors, "\nError: {}", error).ok();
        }
        Error::ExternalTool(_) => {
            writeln!(errors, "\nError occurred during FFmpeg execution: {}", error).ok();
        }
        _ => {
            writeln!(errors, "Error: {:#}", err).ok();
        }
    }
    log_error(error);
    if let Some(action) = error.suggested_action() {
        writeln!(errors, "Hint: {}", action).ok();
    }

    error.exit_code() as u8
}

fn log_error(error: &Error) {
    let code = error.error_code();
    let recoverable = error.is_recoverable();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(code, recoverable, error = %error, "Run ended"),
        LogLevel::Warn => tracing::warn!(code, recoverable, error = %error, "Run ended"),
        LogLevel::Error => tracing::error!(code, recoverable, error = %error, "Run failed"),
    }
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

/// `y` or an empty answer means yes, case and surrounding whitespace ignored.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.is_empty() || answer == "y"
}

/// Ask whether `file_name` should be uploaded. End of input counts as a no.
pub fn confirm_upload<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    file_name: &str,
) -> io::Result<bool> {
    write!(
        output,
        "\nDo you want to upload '{}' to Webflow? (Y/n): ",
        file_name
    )?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}

/// Prompt (unless `assume_yes`) and run the pipeline on `file`.
///
/// Returns `None` when the user declines; nothing is sent to the remote
/// service in that case.
pub async fn upload_if_confirmed<S, T, R, W>(
    pipeline: &UploadPipeline<S, T>,
    file: &Path,
    assume_yes: bool,
    input: &mut R,
    output: &mut W,
    progress: &dyn UploadProgress,
) -> Result<Option<UploadReport>>
where
    S: AssetService,
    T: UploadTarget,
    R: BufRead,
    W: Write,
{
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    if !assume_yes && !confirm_upload(input, output, &file_name)? {
        writeln!(output, "Upload cancelled by user.")?;
        return Ok(None);
    }

    pipeline.run(file, progress).await.map(Some)
}

/// Print the final state of an upload run.
pub fn print_report<W: Write>(output: &mut W, report: &UploadReport) -> io::Result<()> {
    match report {
        UploadReport::Completed {
            outcome: PollOutcome::Resolved(url),
            ..
        } => {
            writeln!(output, "\nSUCCESS! File ready. CDN URL:")?;
            writeln!(output, "{}", SEPARATOR)?;
            writeln!(output, "{}", url)?;
            writeln!(output, "{}", SEPARATOR)
        }
        UploadReport::Completed {
            outcome: PollOutcome::TimedOut { .. },
            ..
        } => writeln!(output, "\nUpload worked, but timed out waiting for URL."),
        UploadReport::Rejected { status, .. } => {
            writeln!(output, "Failed to upload. Status: {}", status)
        }
    }
}

/// Prints pipeline progress to stdout.
pub struct ConsoleProgress;

impl UploadProgress for ConsoleProgress {
    fn on_upload_prepared(&self, file_name: &str) {
        println!("\nPreparing upload for: {}", file_name);
    }

    fn on_folder_created(&self, name: &str) {
        println!("Creating Webflow folder: {}", name);
    }

    fn on_upload_finished(&self, outcome: &UploadOutcome) {
        if let UploadOutcome::Accepted { .. } = outcome {
            println!("Storage upload successful.");
        }
    }

    fn on_poll_started(&self, max_attempts: u32, interval: Duration) {
        println!(
            "Polling Webflow asset list (max {}s)...",
            interval.saturating_mul(max_attempts).as_secs()
        );
    }

    fn on_poll_attempt(&self, attempt: u32, state: &PollAttempt) {
        match state {
            PollAttempt::Ready => {}
            PollAttempt::UrlPending => {
                println!("   ...attempt {}: Asset found, URL generating...", attempt)
            }
            PollAttempt::NotListed => {
                println!("   ...attempt {}: Asset ID not found in list yet.", attempt)
            }
            PollAttempt::Failed(reason) => println!("   ...attempt {} failed: {}", attempt, reason),
        }
    }
}
