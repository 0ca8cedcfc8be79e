// src/email/handlers.rs

use axum::{extract::Extension, response::Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::common::{ApiError, AppState, Validator};
use crate::email::models::{SendEmailRequest, SendEmailResponse};
use crate::email::validators::{is_valid_email, SendEmailValidator};

/// POST /api/send-email - Send the application email with the generated
/// resume and cover letter attached.
///
/// Every check runs before the transport is touched: a bad recipient or
/// a bad attachment path means no email is attempted at all. Delivery
/// failures surface to the caller and are never retried automatically.
pub async fn send_application_email(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let state = state_lock.read().await;

    let validation = SendEmailValidator.validate(&request);
    if !validation.is_valid {
        return Err(validation.into());
    }

    if !is_valid_email(request.recipient_email.trim()) {
        return Err(ApiError::InvalidRecipient(format!(
            "'{}' is not a valid email address",
            request.recipient_email
        )));
    }

    let resume_path = state.artifact_store.resolve_attachment(&request.resume_path)?;
    let cover_letter_path = state
        .artifact_store
        .resolve_attachment(&request.cover_letter_path)?;

    info!("Sending application email");
    state
        .mailer_service
        .send_application_email(
            request.recipient_email.trim(),
            &request.subject,
            &request.body,
            &[resume_path, cover_letter_path],
        )
        .await?;

    Ok(Json(SendEmailResponse {
        message: "Application email sent successfully!".to_string(),
    }))
}
