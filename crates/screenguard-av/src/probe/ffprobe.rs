//! FFprobe-based media probing.

use super::types::ProbeReport;
use super::Prober;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

const TOOL: &str = "ffprobe";

/// Prober that shells out to the `ffprobe` command-line tool.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    program: PathBuf,
}

impl FfprobeProber {
    /// Create a prober that runs the given ffprobe executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The executable this prober runs.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new(TOOL)
    }
}

impl Prober for FfprobeProber {
    fn name(&self) -> &'static str {
        TOOL
    }

    fn probe(&self, path: &Path) -> Result<ProbeReport> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }

        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(self.program.display().to_string())
                } else {
                    Error::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                msg => msg.to_string(),
            };
            #[cfg(feature = "tracing")]
            tracing::debug!(path = %path.display(), %message, "ffprobe failed");
            return Err(Error::tool_failed(TOOL, message));
        }

        let json_str = String::from_utf8(output.stdout)
            .map_err(|e| Error::parse_error(TOOL, format!("Invalid UTF-8: {}", e)))?;

        parse_ffprobe_json(&json_str)
    }
}

/// Parse the JSON document printed by `ffprobe -print_format json`.
pub fn parse_ffprobe_json(json: &str) -> Result<ProbeReport> {
    serde_json::from_str(json).map_err(|e| Error::parse_error(TOOL, e.to_string()))
}
