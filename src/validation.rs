//! Codec and frame-rate checks against the screen requirements.

use crate::config::FPS_TOLERANCE;
use crate::probe::VideoMetadata;
use crate::requirements::RequirementsDocument;
use serde::Serialize;

/// Codec required when the requirements document does not name one.
pub const DEFAULT_CODEC: &str = "h264";

/// Frame rate required when the requirements document does not state one.
pub const DEFAULT_FPS: f64 = 25.0;

/// Slack for float noise when comparing the FPS difference to the tolerance.
const FPS_EPSILON: f64 = 1e-9;

/// Verdict for one file. `valid` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Compares extracted metadata with the requirements document.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    fps_tolerance: f64,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(FPS_TOLERANCE)
    }
}

impl Validator {
    pub fn new(fps_tolerance: f64) -> Self {
        Self { fps_tolerance }
    }

    pub fn fps_tolerance(&self) -> f64 {
        self.fps_tolerance
    }

    /// Check codec first, then frame rate; errors come back in that order.
    pub fn validate(
        &self,
        metadata: &VideoMetadata,
        requirements: &RequirementsDocument,
    ) -> ValidationResult {
        let required_codec = requirements.codec().unwrap_or(DEFAULT_CODEC);
        let required_fps = requirements.fps().unwrap_or(DEFAULT_FPS);
        let mut errors = Vec::new();

        if metadata.codec != required_codec {
            tracing::warn!(
                codec = %metadata.codec,
                required = %required_codec,
                "Codec mismatch"
            );
            errors.push(format!(
                "Invalid codec: {}, required {}",
                metadata.raw_codec, required_codec
            ));
        }

        let fps_diff = (metadata.fps - required_fps).abs();
        if fps_diff - self.fps_tolerance > FPS_EPSILON {
            tracing::warn!(
                fps = metadata.fps,
                required = required_fps,
                difference = fps_diff,
                "FPS mismatch"
            );
            errors.push(format!(
                "Invalid FPS: {}, required {}",
                metadata.fps, required_fps
            ));
        }

        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }
}
