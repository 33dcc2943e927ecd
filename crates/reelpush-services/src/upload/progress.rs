use std::time::Duration;

use reelpush_core::UploadOutcome;

use super::poller::PollAttempt;

/// Observer for user-facing progress. Every hook defaults to doing nothing.
pub trait UploadProgress: Send + Sync {
    fn on_upload_prepared(&self, _file_name: &str) {}

    fn on_folder_created(&self, _name: &str) {}

    fn on_upload_finished(&self, _outcome: &UploadOutcome) {}

    fn on_poll_started(&self, _max_attempts: u32, _interval: Duration) {}

    fn on_poll_attempt(&self, _attempt: u32, _state: &PollAttempt) {}
}

/// Progress observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl UploadProgress for NoProgress {}
