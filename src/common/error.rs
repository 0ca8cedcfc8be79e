// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;

/// API error types
///
/// One variant per failure kind in the pipeline taxonomy, plus the
/// catch-all `BadRequest` / `InternalServer` variants for glue-level
/// failures. Every variant carries a human-readable message that is
/// returned to the caller verbatim.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    UnsupportedFormat(String),
    EmptyDocument(String),
    MalformedAiResponse(String),
    AiServiceUnavailable(String),
    GenerationInputMissing(String),
    InvalidRecipient(String),
    AttachmentNotFound(String),
    InvalidAttachmentPath(String),
    EmailDeliveryFailed(String),
    InternalServer(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::UnsupportedFormat(msg) => write!(f, "Unsupported Format: {}", msg),
            ApiError::EmptyDocument(msg) => write!(f, "Empty Document: {}", msg),
            ApiError::MalformedAiResponse(msg) => write!(f, "Malformed AI Response: {}", msg),
            ApiError::AiServiceUnavailable(msg) => write!(f, "AI Service Unavailable: {}", msg),
            ApiError::GenerationInputMissing(msg) => {
                write!(f, "Generation Input Missing: {}", msg)
            }
            ApiError::InvalidRecipient(msg) => write!(f, "Invalid Recipient: {}", msg),
            ApiError::AttachmentNotFound(msg) => write!(f, "Attachment Not Found: {}", msg),
            ApiError::InvalidAttachmentPath(msg) => {
                write!(f, "Invalid Attachment Path: {}", msg)
            }
            ApiError::EmailDeliveryFailed(msg) => write!(f, "Email Delivery Failed: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// JSON error response structure
///
/// `detail` matches the wire shape the frontend expects; `code` is the
/// machine-readable failure kind.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail, code) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::UnsupportedFormat(msg) => {
                (StatusCode::BAD_REQUEST, msg, "UNSUPPORTED_FORMAT")
            }
            ApiError::EmptyDocument(msg) => (StatusCode::BAD_REQUEST, msg, "EMPTY_DOCUMENT"),
            ApiError::MalformedAiResponse(msg) => {
                error!(detail = %msg, "AI response failed schema validation");
                (StatusCode::BAD_GATEWAY, msg, "MALFORMED_AI_RESPONSE")
            }
            ApiError::AiServiceUnavailable(msg) => {
                error!(detail = %msg, "AI service unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    msg,
                    "AI_SERVICE_UNAVAILABLE",
                )
            }
            ApiError::GenerationInputMissing(msg) => {
                (StatusCode::BAD_REQUEST, msg, "GENERATION_INPUT_MISSING")
            }
            ApiError::InvalidRecipient(msg) => (StatusCode::BAD_REQUEST, msg, "INVALID_RECIPIENT"),
            ApiError::AttachmentNotFound(msg) => {
                (StatusCode::BAD_REQUEST, msg, "ATTACHMENT_NOT_FOUND")
            }
            ApiError::InvalidAttachmentPath(msg) => {
                (StatusCode::BAD_REQUEST, msg, "INVALID_ATTACHMENT_PATH")
            }
            ApiError::EmailDeliveryFailed(msg) => {
                error!(detail = %msg, "Email delivery failed");
                (StatusCode::BAD_GATEWAY, msg, "EMAIL_DELIVERY_FAILED")
            }
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
        };

        let error_response = ErrorResponse {
            detail,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Helper to convert ValidationResult into ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::BadRequest(error_messages.join(", "))
        }
    }
}
