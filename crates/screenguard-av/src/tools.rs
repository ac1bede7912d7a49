//! External tool detection.

use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// FFmpeg tools take `-version` rather than `--version`.
///
/// # Example
///
/// ```no_run
/// use screenguard_av::check_tool;
///
/// let info = check_tool("ffprobe");
/// if info.available {
///     println!("ffprobe version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_at(name, Path::new(name))
}

/// Check a tool at an explicit location, reporting it under `name`.
pub fn check_tool_at(name: &str, program: &Path) -> ToolInfo {
    let result = Command::new(program).arg("-version").output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = if program.components().count() > 1 {
                Some(program.to_path_buf())
            } else {
                which::which(program).ok()
            };

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check the media tools the validator can use.
///
/// Only `ffprobe` is required; `ffmpeg` is reported for diagnostics.
pub fn check_tools(ffprobe_path: Option<&Path>) -> Vec<ToolInfo> {
    let ffprobe = match ffprobe_path {
        Some(path) => check_tool_at("ffprobe", path),
        None => check_tool("ffprobe"),
    };
    vec![ffprobe, check_tool("ffmpeg")]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }

    require_tool(name)
}
