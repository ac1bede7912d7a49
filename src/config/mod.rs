mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
///
/// A relative `requirements_path` is resolved against the directory holding
/// the config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    if let Some(base) = path.parent() {
        let requirements = &config.validation.requirements_path;
        if requirements.is_relative() {
            config.validation.requirements_path = base.join(requirements);
        }
    }

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./screenguard.toml",
        "~/.config/screenguard/config.toml",
        "/etc/screenguard/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.validation.max_upload_bytes == 0 {
        anyhow::bail!("max_upload_bytes must be greater than 0");
    }

    let tolerance = config.validation.fps_tolerance;
    if !tolerance.is_finite() || tolerance < 0.0 {
        anyhow::bail!("fps_tolerance must be a non-negative number, got {}", tolerance);
    }

    if let Some(dir) = &config.validation.upload_dir {
        if !dir.is_dir() {
            tracing::warn!("Upload directory does not exist: {:?}", dir);
        }
    }

    if let Some(ffprobe) = &config.tools.ffprobe_path {
        if !ffprobe.exists() {
            tracing::warn!("Configured ffprobe does not exist: {:?}", ffprobe);
        }
    }

    Ok(())
}
