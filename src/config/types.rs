use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted upload: 400 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 400 * 1024 * 1024;

/// Allowed absolute difference between measured and required FPS.
pub const FPS_TOLERANCE: f64 = 0.1;

/// Requirements document looked up when none is configured.
pub const REQUIREMENTS_FILE: &str = "screenRequirements.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// JSON document holding `commonSettings.codec` and `commonSettings.fps`.
    #[serde(default = "default_requirements_path")]
    pub requirements_path: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    #[serde(default = "default_fps_tolerance")]
    pub fps_tolerance: f64,

    /// Directory for in-flight uploads (system temp dir when unset).
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
}

fn default_requirements_path() -> PathBuf {
    PathBuf::from(REQUIREMENTS_FILE)
}
fn default_max_upload_bytes() -> u64 {
    MAX_UPLOAD_BYTES
}
fn default_fps_tolerance() -> f64 {
    FPS_TOLERANCE
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            requirements_path: default_requirements_path(),
            max_upload_bytes: default_max_upload_bytes(),
            fps_tolerance: default_fps_tolerance(),
            upload_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}
