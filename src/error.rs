//! Error taxonomy for the validation service.
//!
//! Every failure the upload pipeline can hit maps onto one variant here, and
//! each variant knows the HTTP status it surfaces as via
//! [`Error::http_status`].

use crate::probe::MediaError;
use crate::requirements::RequirementsError;

pub type Result<T> = std::result::Result<T, Error>;

const MIB: u64 = 1024 * 1024;

/// Message shown for faults whose details stay in the server log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Declared content type is not `video/*`.
    #[error("Invalid file type: {content_type}. A video file is expected.")]
    ContentTypeRejected { content_type: String },

    /// Declared filename could escape a directory.
    #[error("Invalid file name")]
    UnsafeFilename { filename: String },

    /// Upload grew past the configured limit.
    #[error("File is too large. Maximum size: {} MB", .limit_bytes / MIB)]
    SizeExceeded { limit_bytes: u64 },

    /// Request is not a usable upload (bad multipart body, missing file
    /// field, unparseable query).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Uploaded content could not be probed.
    #[error("Failed to analyze video file: {0}")]
    Media(#[from] MediaError),

    /// Requirements document unavailable.
    #[error(transparent)]
    Requirements(#[from] RequirementsError),

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::ContentTypeRejected { .. } => 400,
            Error::UnsafeFilename { .. } => 400,
            Error::SizeExceeded { .. } => 413,
            Error::BadRequest(_) => 400,
            Error::Media(_) => 400,
            Error::Requirements(_) => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Error::ContentTypeRejected { .. } => "content_type_rejected",
            Error::UnsafeFilename { .. } => "unsafe_filename",
            Error::SizeExceeded { .. } => "size_exceeded",
            Error::BadRequest(_) => "bad_request",
            Error::Media(MediaError::ProbeFailed(_)) => "probe_failed",
            Error::Media(MediaError::NoVideoStream) => "no_video_stream",
            Error::Media(MediaError::CodecUnknown) => "codec_unknown",
            Error::Media(MediaError::FpsUnknown { .. }) => "fps_unknown",
            Error::Requirements(RequirementsError::Missing { .. }) => "config_missing",
            Error::Requirements(RequirementsError::Invalid { .. }) => "config_invalid",
            Error::Requirements(RequirementsError::Load { .. }) => "config_load_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Text safe to show the caller. Unexpected faults collapse into a
    /// generic message.
    pub fn user_message(&self) -> String {
        match self {
            Error::Io { .. } | Error::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
