//! # screenguard-av
//!
//! Video stream probing for the screenguard upload validator.
//!
//! This crate provides:
//! - A [`Prober`] capability that reports the stream list of a media file,
//!   with an `ffprobe`-backed implementation ([`FfprobeProber`])
//! - Codec identifier normalization ([`normalize_codec`])
//! - Tolerant frame-rate expression parsing ([`parse_fps`])
//! - External tool detection
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use screenguard_av::{FfprobeProber, Prober};
//! use std::path::Path;
//!
//! let report = FfprobeProber::default().probe(Path::new("/path/to/clip.mp4"))?;
//! if let Some(video) = report.first_video_stream() {
//!     println!("Video codec: {:?}", video.codec_name);
//! }
//! # Ok::<(), screenguard_av::Error>(())
//! ```

pub mod codec;
mod error;
pub mod frame_rate;
pub mod probe;
pub mod tools;

// Re-exports
pub use codec::normalize_codec;
pub use error::{Error, Result};
pub use frame_rate::parse_fps;
pub use probe::{FfprobeProber, FormatInfo, ProbeReport, Prober, StreamInfo};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
