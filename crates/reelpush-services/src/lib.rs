//! Reelpush Services Layer
//!
//! Orchestration of the upload pipeline: folder resolution, upload
//! initiation, the form upload hand-off and availability polling. Everything
//! here talks to the outside world only through the traits in `reelpush-core`,
//! so the CLI decides which concrete client is used.

pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use upload::{
    initiate_upload, poll_for_url, poll_for_url_with_progress, resolve_or_create_folder,
    NoProgress, PipelineSettings, PollAttempt, UploadPipeline, UploadProgress, UploadReport,
};
