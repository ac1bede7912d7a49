// Re-export probing functionality from screenguard-av
pub use screenguard_av::probe::*;
pub use screenguard_av::{
    check_tool, check_tools, normalize_codec, parse_fps, require_tool, ToolInfo,
};
pub use screenguard_av::tools::get_tool_path;

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Why a file could not be turned into [`VideoMetadata`].
///
/// All of these are caused by the uploaded content, not by the server.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to read video file: {0}")]
    ProbeFailed(#[from] screenguard_av::Error),

    #[error("File contains no video stream")]
    NoVideoStream,

    #[error("Could not determine the video codec")]
    CodecUnknown,

    #[error("Could not determine the video FPS (reported {raw:?})")]
    FpsUnknown { raw: String },
}

/// Codec and frame rate of the first video stream of a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    /// Canonical codec token used for comparisons.
    pub codec: String,
    /// Frame rate rounded to two decimals; never zero.
    pub fps: f64,
    /// Codec name exactly as the prober reported it.
    pub raw_codec: String,
    /// Frame-rate expression exactly as the prober reported it.
    pub raw_fps: String,
}

impl VideoMetadata {
    /// Pick the first video stream out of a probe report.
    pub fn from_report(report: &ProbeReport) -> Result<Self, MediaError> {
        let stream = report
            .first_video_stream()
            .ok_or(MediaError::NoVideoStream)?;

        let raw_codec = match stream.codec_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(MediaError::CodecUnknown),
        };

        let raw_fps = stream.frame_rate_expr().unwrap_or("0/1").to_string();
        let fps = parse_fps(&raw_fps);
        if fps == 0.0 {
            return Err(MediaError::FpsUnknown { raw: raw_fps });
        }

        Ok(Self {
            codec: normalize_codec(&raw_codec),
            fps,
            raw_codec,
            raw_fps,
        })
    }
}

/// Build the ffprobe prober named by the `[tools]` section, falling back to
/// `ffprobe` on `PATH`. A missing binary is logged, not fatal.
pub fn ffprobe_from_config(tools: &crate::config::ToolsConfig) -> FfprobeProber {
    let configured = tools.ffprobe_path.as_deref();
    let program = match get_tool_path("ffprobe", configured) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("{}; uploads will fail to probe until it is installed", e);
            configured
                .map(Path::to_path_buf)
                .unwrap_or_else(|| "ffprobe".into())
        }
    };
    tracing::info!("Using ffprobe at {:?}", program);
    FfprobeProber::new(program)
}

/// Runs a [`Prober`] and reduces its report to [`VideoMetadata`].
#[derive(Clone)]
pub struct MetadataExtractor {
    prober: Arc<dyn Prober>,
}

impl MetadataExtractor {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    pub fn prober_name(&self) -> &'static str {
        self.prober.name()
    }

    /// Probe `path` and extract the first video stream's codec and frame rate.
    ///
    /// Blocks while the prober runs.
    pub fn extract(&self, path: &Path) -> Result<VideoMetadata, MediaError> {
        let report = self.prober.probe(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Probe failed");
            MediaError::from(e)
        })?;

        let metadata = VideoMetadata::from_report(&report)?;
        tracing::info!(
            codec = %metadata.raw_codec,
            fps = metadata.fps,
            raw_fps = %metadata.raw_fps,
            "Extracted video metadata"
        );
        Ok(metadata)
    }
}

impl std::fmt::Debug for MetadataExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataExtractor")
            .field("prober", &self.prober.name())
            .finish()
    }
}
