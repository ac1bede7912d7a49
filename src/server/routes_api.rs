use crate::error::Error;
use crate::server::error::{ApiError, UploadError};
use crate::server::{AppContext, HEALTH_MESSAGE};
use crate::service::ValidationReport;
use crate::upload::{check_content_type, check_filename};
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::QueryRejection, DefaultBodyLimit, Multipart,
        Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Multipart field carrying the video.
pub const FILE_FIELD: &str = "file";

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health))
        .route("/requirements", get(get_requirements))
        .route(
            "/validate-video",
            post(validate_video).layer(DefaultBodyLimit::disable()),
        )
}

/// Body of every `POST /api/validate-video` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub codec: Option<String>,
    pub fps: Option<f64>,
    pub errors: Vec<String>,
}

impl ValidationResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            codec: None,
            fps: None,
            errors: vec![message.into()],
        }
    }
}

impl From<&ValidationReport> for ValidationResponse {
    fn from(report: &ValidationReport) -> Self {
        Self {
            valid: report.result.valid,
            codec: Some(report.metadata.raw_codec.clone()),
            fps: Some(report.metadata.fps),
            errors: report.result.errors.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    /// Screen the upload is destined for. Accepted but not used for validation.
    pub screen_id: Option<i64>,
}

async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": HEALTH_MESSAGE,
        "version": env!("CARGO_PKG_VERSION"),
        "requirements_loaded": ctx.service.requirements().is_loaded(),
    }))
}

async fn get_requirements(State(ctx): State<AppContext>) -> Result<Json<Value>, ApiError> {
    let doc = ctx.service.requirements().load()?;
    Ok(Json(doc.raw().clone()))
}

async fn validate_video(
    State(ctx): State<AppContext>,
    query: Result<Query<ValidateQuery>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ValidationResponse>, UploadError> {
    let Query(query) = query.map_err(|e| Error::BadRequest(e.body_text()))?;
    let mut multipart = multipart.map_err(|e| Error::BadRequest(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        tracing::info!(
            screen_id = ?query.screen_id,
            filename = ?filename,
            content_type = ?content_type,
            "Validating upload"
        );

        check_content_type(content_type.as_deref())?;
        check_filename(filename.as_deref())?;

        let report = ctx.service.validate_upload(field).await?;
        if report.is_valid() {
            tracing::info!(
                codec = %report.metadata.raw_codec,
                fps = report.metadata.fps,
                "Video passed validation"
            );
        } else {
            tracing::warn!(errors = ?report.result.errors, "Video failed validation");
        }

        return Ok(Json(ValidationResponse::from(&report)));
    }

    Err(Error::BadRequest(format!("missing multipart field `{}`", FILE_FIELD)).into())
}
