//! Screen requirements document.
//!
//! The requirements live in a JSON file shaped like
//! `{"commonSettings": {"codec": "h264", "fps": 25}, ...}`. The store reads it
//! on first use and keeps the parsed document for the rest of the process
//! lifetime; a failed load leaves the cache empty so the next call retries.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Failure to obtain the requirements document.
#[derive(Debug, thiserror::Error)]
pub enum RequirementsError {
    #[error("Configuration file {} not found", path.display())]
    Missing { path: PathBuf },

    #[error("Invalid JSON in configuration file {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("Failed to load configuration file {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Parsed requirements document.
///
/// Keeps the raw JSON for pass-through to clients alongside the typed
/// settings the validator consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementsDocument {
    raw: Value,
    codec: Option<String>,
    fps: Option<f64>,
}

impl RequirementsDocument {
    /// Build a document from parsed JSON. The top level must be an object.
    ///
    /// `commonSettings.codec` and `commonSettings.fps` are picked up when they
    /// have the right JSON type and ignored otherwise.
    pub fn from_json(raw: Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }

        let settings = raw.get("commonSettings");
        let codec = settings
            .and_then(|s| s.get("codec"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let fps = settings.and_then(|s| s.get("fps")).and_then(Value::as_f64);

        Some(Self { raw, codec, fps })
    }

    /// Document with just the two settings the validator reads.
    pub fn new(codec: impl Into<String>, fps: f64) -> Self {
        let codec = codec.into();
        let raw = serde_json::json!({ "commonSettings": { "codec": codec, "fps": fps } });
        Self {
            raw,
            codec: Some(codec),
            fps: Some(fps),
        }
    }

    /// The document exactly as read from disk.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Required codec, if the document states one.
    pub fn codec(&self) -> Option<&str> {
        self.codec.as_deref()
    }

    /// Required frame rate, if the document states one.
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }
}

/// Lazily loaded, write-once cache of the requirements document.
#[derive(Debug)]
pub struct RequirementsStore {
    path: PathBuf,
    cache: OnceLock<Arc<RequirementsDocument>>,
}

impl RequirementsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceLock::new(),
        }
    }

    /// Store that is already populated, for callers that build the document
    /// themselves.
    pub fn preloaded(path: impl Into<PathBuf>, document: RequirementsDocument) -> Self {
        let store = Self::new(path);
        let _ = store.cache.set(Arc::new(document));
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Return the cached document, reading it from disk on first success.
    ///
    /// Concurrent first calls may each read the file; the first value stored
    /// wins and every caller gets that one.
    pub fn load(&self) -> Result<Arc<RequirementsDocument>, RequirementsError> {
        if let Some(doc) = self.cache.get() {
            return Ok(Arc::clone(doc));
        }

        let doc = self.read()?;
        let doc = self.cache.get_or_init(|| Arc::new(doc));
        tracing::info!(
            path = %self.path.display(),
            codec = ?doc.codec(),
            fps = ?doc.fps(),
            "Requirements loaded"
        );
        Ok(Arc::clone(doc))
    }

    fn read(&self) -> Result<RequirementsDocument, RequirementsError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                tracing::error!(path = %self.path.display(), "Requirements file not found");
                RequirementsError::Missing {
                    path: self.path.clone(),
                }
            } else {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to read requirements");
                RequirementsError::Load {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        let invalid = |reason: String| {
            tracing::error!(path = %self.path.display(), %reason, "Invalid requirements file");
            RequirementsError::Invalid {
                path: self.path.clone(),
                reason,
            }
        };

        let raw: Value = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        RequirementsDocument::from_json(raw)
            .ok_or_else(|| invalid("top-level value is not an object".to_string()))
    }
}
