// src/services/mod.rs
//
// Shared services wrapping the external collaborators: PDF text
// extraction, the Gemini API, document rendering, and SMTP delivery.

pub mod extractor;
pub mod gemini;
pub mod generator;
pub mod mailer;

// Re-export commonly used types for convenience
pub use gemini::GeminiService;
pub use mailer::MailerService;
