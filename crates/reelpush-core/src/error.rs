//! Error types module
//!
//! All failures in the pipeline are unified under [`Error`]. Each variant knows
//! whether it ends the run, whether a retry could help and how loudly it should
//! be logged, via [`ErrorMetadata`].

use std::io;
use std::process::ExitStatus;

pub type Result<T> = std::result::Result<T, Error>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected outcomes such as a declined or partial upload
    Debug,
    /// Recoverable issues like a single failed poll attempt
    Warn,
    /// Failures that end the run
    Error,
}

/// Describes how an error should be presented and handled by callers.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "REMOTE_SERVICE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error ends the run with a non-zero exit code
    fn is_fatal(&self) -> bool;

    /// Whether retrying the same operation may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the operator
    fn suggested_action(&self) -> Option<&'static str>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Process exit code for this error
    fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            1
        } else {
            0
        }
    }
}

/// Failures of the external transcoder process.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("'{binary}' command not found. Ensure FFmpeg is installed")]
    BinaryNotFound { binary: String },

    #[error("failed to start '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("transcoder exited with {status}")]
    Failed { status: ExitStatus },

    #[error("transcoder did not finish within {seconds}s and was killed")]
    TimedOut { seconds: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External tool error: {0}")]
    ExternalTool(#[from] TranscodeError),

    #[error("Remote service error during {operation}{}: {message}", status_suffix(.status))]
    RemoteService {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Upload rejected with status {status} (expected {expected})")]
    UploadRejected { status: u16, expected: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timed out after {attempts} attempts waiting for asset URL")]
    PollTimeout { attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (status {})", code))
        .unwrap_or_default()
}

impl Error {
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        Error::RemoteService {
            operation,
            status: None,
            message: message.into(),
        }
    }

    pub fn remote_status(operation: &'static str, status: u16, message: impl Into<String>) -> Self {
        Error::RemoteService {
            operation,
            status: Some(status),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(format!("JSON parsing error: {}", err))
    }
}

impl ErrorMetadata for Error {
    fn error_code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::ExternalTool(_) => "EXTERNAL_TOOL_ERROR",
            Error::RemoteService { .. } => "REMOTE_SERVICE_ERROR",
            Error::UploadRejected { .. } => "UPLOAD_REJECTED",
            Error::Transport(_) => "TRANSPORT_ERROR",
            Error::PollTimeout { .. } => "POLL_TIMEOUT",
            Error::Io(_) => "IO_ERROR",
        }
    }

    fn is_fatal(&self) -> bool {
        match self {
            Error::Validation(_)
            | Error::ExternalTool(_)
            | Error::RemoteService { .. }
            | Error::Transport(_)
            | Error::Io(_) => true,
            // Reported to the user, then the run exits cleanly.
            Error::UploadRejected { .. } | Error::PollTimeout { .. } => false,
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Error::RemoteService { status, .. } => match status {
                Some(code) => *code == 429 || *code >= 500,
                None => true,
            },
            Error::Transport(_) | Error::PollTimeout { .. } => true,
            _ => false,
        }
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            Error::Validation(_) => Some("Check the input file and the .env configuration"),
            Error::ExternalTool(TranscodeError::BinaryNotFound { .. }) => {
                Some("Install FFmpeg or set FFMPEG_PATH")
            }
            Error::ExternalTool(_) => Some("Check the transcoder output above"),
            Error::RemoteService {
                status: Some(401) | Some(403),
                ..
            } => Some("Check WEBFLOW_API_TOKEN and its site scopes"),
            Error::RemoteService { .. } | Error::Transport(_) => {
                Some("Retry after a short delay")
            }
            Error::UploadRejected { .. } => Some("Run the upload again to get a fresh session"),
            Error::PollTimeout { .. } => {
                Some("The upload likely succeeded; check the site's asset panel")
            }
            Error::Io(_) => None,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            Error::UploadRejected { .. } => LogLevel::Warn,
            Error::PollTimeout { .. } => LogLevel::Debug,
            _ => LogLevel::Error,
        }
    }
}
