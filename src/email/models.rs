// src/email/models.rs

use serde::{Deserialize, Serialize};

/// Request body for POST /api/send-email. The paths must point at
/// previously generated artifacts inside the artifact store.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub recipient_email: String,
    pub subject: String,
    pub body: String,
    pub resume_path: String,
    pub cover_letter_path: String,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub message: String,
}
