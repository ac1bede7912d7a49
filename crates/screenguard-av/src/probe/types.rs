//! Probe report types.

use serde::{Deserialize, Serialize};

/// Stream type reported for video streams.
pub const VIDEO_STREAM: &str = "video";

/// Stream metadata reported by a [`Prober`](super::Prober).
///
/// Field names follow ffprobe's JSON output so a report can be deserialized
/// directly from `ffprobe -show_streams -of json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Streams in container order.
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
    /// Container-level information, if the prober reports it.
    #[serde(default)]
    pub format: Option<FormatInfo>,
}

/// A single elementary stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Stream index within the container.
    #[serde(default)]
    pub index: u32,
    /// Stream type (`"video"`, `"audio"`, `"subtitle"`, `"data"`).
    #[serde(default)]
    pub codec_type: Option<String>,
    /// Short codec name (e.g. `"h264"`, `"hevc"`).
    #[serde(default)]
    pub codec_name: Option<String>,
    /// Exact frame rate as a rational expression (e.g. `"30000/1001"`).
    #[serde(default)]
    pub r_frame_rate: Option<String>,
    /// Average frame rate as a rational expression.
    #[serde(default)]
    pub avg_frame_rate: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Container-level information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatInfo {
    #[serde(default)]
    pub format_name: Option<String>,
    /// Duration in seconds, as ffprobe prints it.
    #[serde(default)]
    pub duration: Option<String>,
    /// Size in bytes, as ffprobe prints it.
    #[serde(default)]
    pub size: Option<String>,
}

impl ProbeReport {
    /// The first stream whose type is video, in container order.
    pub fn first_video_stream(&self) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.is_video())
    }
}

impl StreamInfo {
    /// Whether this is a video stream.
    pub fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some(VIDEO_STREAM)
    }

    /// Frame-rate expression, preferring the exact rate over the average.
    ///
    /// Returns `None` when the stream reports neither.
    pub fn frame_rate_expr(&self) -> Option<&str> {
        self.r_frame_rate
            .as_deref()
            .or(self.avg_frame_rate.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(kind: &str, codec: &str) -> StreamInfo {
        StreamInfo {
            codec_type: Some(kind.to_string()),
            codec_name: Some(codec.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_video_stream_skips_audio() {
        let report = ProbeReport {
            streams: vec![stream("audio", "aac"), stream("video", "h264"), stream("video", "mjpeg")],
            format: None,
        };
        let video = report.first_video_stream().unwrap();
        assert_eq!(video.codec_name.as_deref(), Some("h264"));
    }

    #[test]
    fn test_no_video_stream() {
        let report = ProbeReport {
            streams: vec![stream("audio", "aac")],
            format: None,
        };
        assert!(report.first_video_stream().is_none());
    }

    #[test]
    fn test_frame_rate_prefers_exact_rate() {
        let s = StreamInfo {
            r_frame_rate: Some("25/1".into()),
            avg_frame_rate: Some("24/1".into()),
            ..Default::default()
        };
        assert_eq!(s.frame_rate_expr(), Some("25/1"));

        let s = StreamInfo {
            avg_frame_rate: Some("24/1".into()),
            ..Default::default()
        };
        assert_eq!(s.frame_rate_expr(), Some("24/1"));

        assert_eq!(StreamInfo::default().frame_rate_expr(), None);
    }
}
