//! Upload pipeline: hash → resolve folder → initiate → upload → poll.

mod folder;
mod initiator;
mod pipeline;
mod poller;
mod progress;

pub use folder::resolve_or_create_folder;
pub use initiator::initiate_upload;
pub use pipeline::{PipelineSettings, UploadPipeline, UploadReport};
pub use poller::{poll_for_url, poll_for_url_with_progress, PollAttempt};
pub use progress::{NoProgress, UploadProgress};
