//! Reelpush Core Library
//!
//! Domain models, error types, configuration and the remote asset service
//! seam shared by the processing, client and CLI crates.

pub mod config;
pub mod error;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, ErrorMetadata, LogLevel, Result, TranscodeError};
pub use models::{
    Digest, FolderId, PollOutcome, RemoteAsset, RemoteFolder, UploadOutcome, UploadSession,
};
pub use service::{AssetService, UploadTarget};
