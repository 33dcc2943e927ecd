//! Reelpush Media Processing Library
//!
//! Local-side work that happens before anything is sent over the network:
//! transcoding the source video, fingerprinting the result and comparing sizes.

pub mod hasher;
pub mod report;
pub mod transcoder;

pub use hasher::{digest, LocalFile};
pub use report::{format_bytes, SizeReport};
pub use transcoder::{Transcoded, Transcoder, TranscoderConfig};
