// Application state shared across all modules

use std::sync::Arc;

use crate::documents::store::ArtifactStore;
use crate::services::{GeminiService, MailerService};

/// Application state containing the external-service handles and the
/// artifact store. The server itself is stateless: nothing in here is
/// per-request, and callers carry analysis results between calls.
#[derive(Clone)]
pub struct AppState {
    pub gemini_service: Arc<GeminiService>,
    pub mailer_service: Arc<MailerService>,
    pub artifact_store: Arc<ArtifactStore>,
}
