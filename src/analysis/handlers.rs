// src/analysis/handlers.rs

use axum::{
    extract::{Extension, Multipart},
    response::Json,
};
use bytes::Bytes;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::analysis::analyze_documents;
use crate::analysis::models::AnalysisResult;
use crate::common::{ApiError, AppState};
use crate::services::extractor;

/// One uploaded file from a multipart form.
pub(crate) struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// The multipart fields shared by the analyze and generate endpoints.
#[derive(Default)]
pub(crate) struct UploadFields {
    pub resume: Option<UploadedFile>,
    pub job_description: Option<UploadedFile>,
    pub format: Option<String>,
}

pub(crate) async fn collect_upload_fields(
    multipart: &mut Multipart,
) -> Result<UploadFields, ApiError> {
    let mut fields = UploadFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart payload".to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid resume file".to_string()))?;
                fields.resume = Some(UploadedFile { filename, bytes });
            }
            Some("job_description") => {
                let filename = field
                    .file_name()
                    .unwrap_or("job_description.pdf")
                    .to_string();
                let bytes = field.bytes().await.map_err(|_| {
                    ApiError::BadRequest("Invalid job description file".to_string())
                })?;
                fields.job_description = Some(UploadedFile { filename, bytes });
            }
            Some("format") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid format field".to_string()))?;
                fields.format = Some(value);
            }
            _ => {}
        }
    }

    Ok(fields)
}

pub(crate) fn require_uploads(
    fields: &UploadFields,
) -> Result<(&UploadedFile, &UploadedFile), ApiError> {
    let resume = fields
        .resume
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("Missing 'resume' file field".to_string()))?;
    let job = fields.job_description.as_ref().ok_or_else(|| {
        ApiError::BadRequest("Missing 'job_description' file field".to_string())
    })?;
    Ok((resume, job))
}

/// POST /api/upload-and-analyze - Analyze a resume against a job description
pub async fn upload_and_analyze(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let state = state_lock.read().await;

    let fields = collect_upload_fields(&mut multipart).await?;
    let (resume, job) = require_uploads(&fields)?;

    info!("Extracting text from uploaded PDFs");
    let resume_text = extractor::extract_text(&resume.bytes, &resume.filename)?;
    let job_text = extractor::extract_text(&job.bytes, &job.filename)?;

    info!("Analyzing documents with AI");
    let result = analyze_documents(&state.gemini_service, &resume_text, &job_text).await?;

    info!(
        job_title = %result.job_analysis.job_title,
        match_percentage = result.match_percentage,
        "Analysis completed"
    );
    Ok(Json(result))
}

/// GET /api/health - Liveness probe, no side effects
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET / - Service banner
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Automated Career Assistant API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
