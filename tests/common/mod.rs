//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which lays out a temporary directory with a
//! requirements document and an upload directory, and builds an
//! [`AppContext`] around a [`StaticProber`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use screenguard::config::Config;
use screenguard::probe::{ProbeReport, Prober, StreamInfo};
use screenguard_av::Error as ProbeError;
use screenguard::server::{create_router, AppContext};
use tempfile::TempDir;

pub const BOUNDARY: &str = "screenguard-test-boundary";

pub const H264_25: &str = r#"{"commonSettings": {"codec": "h264", "fps": 25}}"#;

/// What the [`StaticProber`] reports for every file.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Video { codec: String, rate: String },
    AudioOnly,
    Unreadable,
}

impl ProbeOutcome {
    pub fn video(codec: &str, rate: &str) -> Self {
        Self::Video {
            codec: codec.to_string(),
            rate: rate.to_string(),
        }
    }
}

/// Prober with a canned answer that counts its calls.
#[derive(Debug)]
pub struct StaticProber {
    outcome: ProbeOutcome,
    calls: AtomicUsize,
}

impl StaticProber {
    pub fn new(outcome: ProbeOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Prober for StaticProber {
    fn name(&self) -> &'static str {
        "static"
    }

    fn probe(&self, path: &Path) -> screenguard_av::Result<ProbeReport> {
        assert!(path.exists(), "upload must exist while probing");
        self.calls.fetch_add(1, Ordering::SeqCst);

        let stream = match &self.outcome {
            ProbeOutcome::Video { codec, rate } => StreamInfo {
                codec_type: Some("video".into()),
                codec_name: Some(codec.clone()),
                r_frame_rate: Some(rate.clone()),
                ..Default::default()
            },
            ProbeOutcome::AudioOnly => StreamInfo {
                codec_type: Some("audio".into()),
                codec_name: Some("aac".into()),
                ..Default::default()
            },
            ProbeOutcome::Unreadable => {
                return Err(ProbeError::tool_failed(
                    "ffprobe",
                    "Invalid data found when processing input",
                ))
            }
        };

        Ok(ProbeReport {
            streams: vec![stream],
            format: None,
        })
    }
}

/// Test harness wrapping an [`AppContext`] rooted in a temporary directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub prober: Arc<StaticProber>,
    pub dir: TempDir,
}

impl TestHarness {
    /// Requirements `h264` at 25 fps, prober reporting `h264` at `25/1`.
    pub fn new() -> Self {
        Self::build(Some(H264_25), ProbeOutcome::video("h264", "25/1"), None)
    }

    pub fn with_outcome(outcome: ProbeOutcome) -> Self {
        Self::build(Some(H264_25), outcome, None)
    }

    /// `requirements` is written verbatim; `None` leaves the file absent.
    pub fn build(
        requirements: Option<&str>,
        outcome: ProbeOutcome,
        max_upload_bytes: Option<u64>,
    ) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let uploads = dir.path().join("uploads");
        std::fs::create_dir(&uploads).expect("failed to create upload dir");

        let requirements_path = dir.path().join("screenRequirements.json");
        if let Some(doc) = requirements {
            std::fs::write(&requirements_path, doc).expect("failed to write requirements");
        }

        let mut config = Config::default();
        config.validation.requirements_path = requirements_path;
        config.validation.upload_dir = Some(uploads);
        if let Some(limit) = max_upload_bytes {
            config.validation.max_upload_bytes = limit;
        }

        let prober = Arc::new(StaticProber::new(outcome));
        let ctx = AppContext::new(config, prober.clone());

        Self { ctx, prober, dir }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Files left behind in the upload directory.
    pub fn leftover_uploads(&self) -> usize {
        std::fs::read_dir(self.upload_dir())
            .expect("failed to read upload dir")
            .count()
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

/// Encode one multipart part under [`BOUNDARY`].
pub fn multipart_body(
    field: &str,
    filename: Option<&str>,
    content_type: Option<&str>,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());

    let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", field);
    if let Some(name) = filename {
        disposition.push_str(&format!("; filename=\"{}\"", name));
    }
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(b"\r\n");

    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", ct).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
