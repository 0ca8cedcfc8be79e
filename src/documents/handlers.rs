// src/documents/handlers.rs

use axum::{
    extract::{Extension, Multipart},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::analysis::analyze_documents;
use crate::analysis::handlers::{collect_upload_fields, require_uploads};
use crate::common::{ApiError, AppState};
use crate::documents::models::{slot_filename, DocumentFormat, DocumentKind, GeneratedDocument};
use crate::services::{extractor, generator};

/// POST /api/generate-resume - Generate a tailored resume
pub async fn generate_resume(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    generate_document(state_lock, DocumentKind::Resume, multipart).await
}

/// POST /api/generate-cover-letter - Generate a cover letter
pub async fn generate_cover_letter(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    generate_document(state_lock, DocumentKind::CoverLetter, multipart).await
}

/// Shared pipeline for both document kinds: extract both texts, re-run
/// the analysis (the server holds no session state), validate the
/// generation inputs, ask the model for tailored content, render it, and
/// overwrite the fixed-name artifact slot.
async fn generate_document(
    state_lock: Arc<RwLock<AppState>>,
    kind: DocumentKind,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await;

    let fields = collect_upload_fields(&mut multipart).await?;

    let format_param = fields.format.clone().unwrap_or_else(|| "docx".to_string());
    let format = DocumentFormat::from_param(&format_param).ok_or_else(|| {
        ApiError::UnsupportedFormat(format!(
            "Format must be 'docx' or 'pdf', got '{}'",
            format_param
        ))
    })?;

    let (resume, job) = require_uploads(&fields)?;

    info!(kind = %kind, format = %format, "Extracting text from uploaded PDFs");
    let resume_text = extractor::extract_text(&resume.bytes, &resume.filename)?;
    let job_text = extractor::extract_text(&job.bytes, &job.filename)?;

    let analysis = analyze_documents(&state.gemini_service, &resume_text, &job_text).await?;

    // Refuse before spending the content-generation call if the analysis
    // lacks the minimum facts for this document kind.
    generator::validate_inputs(kind, &analysis)?;

    info!(kind = %kind, "Generating tailored document content");
    let content = state
        .gemini_service
        .generate_content(kind, &resume_text, &job_text)
        .await?;

    let bytes = generator::generate(kind, format, &analysis, &content)?;
    let document = GeneratedDocument {
        kind,
        format,
        filename: slot_filename(kind, format),
        bytes,
    };

    let path = state.artifact_store.store(&document).await?;
    info!(kind = %kind, format = %format, path = %path.display(), "Document generated");

    let headers = [
        (
            header::CONTENT_TYPE,
            format.content_type().to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ),
    ];

    Ok((headers, document.bytes).into_response())
}
