//! Upload validation pipeline.
//!
//! [`ValidationService`] drives one upload from the request stream to a
//! verdict: requirements preload, temp-file storage with a size cap, probing
//! on the blocking pool, and the codec/fps checks. The temp file is owned by
//! the pipeline future and removed when it finishes or is dropped.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::probe::{MetadataExtractor, Prober, VideoMetadata};
use crate::requirements::RequirementsStore;
use crate::upload::UploadedFile;
use crate::validation::{ValidationResult, Validator};
use bytes::Bytes;
use futures::Stream;
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Metadata of the checked file together with the verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub metadata: VideoMetadata,
    pub result: ValidationResult,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.result.valid
    }
}

#[derive(Debug, Clone)]
pub struct ValidationService {
    requirements: Arc<RequirementsStore>,
    extractor: MetadataExtractor,
    validator: Validator,
    max_upload_bytes: u64,
    upload_dir: Option<PathBuf>,
}

impl ValidationService {
    pub fn new(
        requirements: Arc<RequirementsStore>,
        prober: Arc<dyn Prober>,
        max_upload_bytes: u64,
        fps_tolerance: f64,
        upload_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            requirements,
            extractor: MetadataExtractor::new(prober),
            validator: Validator::new(fps_tolerance),
            max_upload_bytes,
            upload_dir,
        }
    }

    /// Build a service from the `[validation]` section of the config.
    pub fn from_config(
        config: &Config,
        requirements: Arc<RequirementsStore>,
        prober: Arc<dyn Prober>,
    ) -> Self {
        Self::new(
            requirements,
            prober,
            config.validation.max_upload_bytes,
            config.validation.fps_tolerance,
            config.validation.upload_dir.clone(),
        )
    }

    pub fn requirements(&self) -> &RequirementsStore {
        &self.requirements
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Store an upload stream in a temp file and validate it.
    ///
    /// Callers run the declared content-type and filename checks first; see
    /// [`crate::upload`].
    pub async fn validate_upload<S, E>(&self, chunks: S) -> Result<ValidationReport>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Display,
    {
        let requirements = self.requirements.load()?;

        let mut upload = UploadedFile::create(self.upload_dir.as_deref())?;
        let size = upload.write_stream(chunks, self.max_upload_bytes).await?;
        tracing::info!(path = %upload.path().display(), bytes = size, "Upload stored");

        let metadata = self.extract(upload.path()).await?;
        let result = self.validator.validate(&metadata, &requirements);

        Ok(ValidationReport { metadata, result })
    }

    /// Validate a file already on disk.
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationReport> {
        let requirements = self.requirements.load()?;
        let metadata = self.extract(path).await?;
        let result = self.validator.validate(&metadata, &requirements);
        Ok(ValidationReport { metadata, result })
    }

    /// Run the extractor on the blocking pool.
    pub async fn extract(&self, path: &Path) -> Result<VideoMetadata> {
        let extractor = self.extractor.clone();
        let path = path.to_path_buf();

        let metadata = tokio::task::spawn_blocking(move || extractor.extract(&path))
            .await
            .map_err(|e| Error::Internal(format!("probe task failed: {e}")))??;

        Ok(metadata)
    }
}
