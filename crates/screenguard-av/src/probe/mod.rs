//! Media file probing.
//!
//! The [`Prober`] trait is the seam between the validator and whatever tool
//! reads stream metadata. [`FfprobeProber`] is the production implementation;
//! tests substitute an in-memory one.

mod ffprobe;
mod types;

pub use ffprobe::{parse_ffprobe_json, FfprobeProber};
pub use types::*;

use crate::Result;
use std::path::Path;

/// A media file prober capable of listing the streams of a file.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
/// Probing may block on an external process; async callers should run it on
/// a blocking thread.
pub trait Prober: Send + Sync {
    /// Human-readable name identifying this prober implementation.
    fn name(&self) -> &'static str;

    /// Probe a media file at the given path and report its streams.
    fn probe(&self, path: &Path) -> Result<ProbeReport>;
}
