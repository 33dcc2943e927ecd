//! Data models for the upload pipeline
//!
//! Every entity here lives for a single run; nothing is cached between runs.

mod asset;
mod digest;
mod folder;
mod upload_session;

pub use asset::*;
pub use digest::*;
pub use folder::*;
pub use upload_session::*;
