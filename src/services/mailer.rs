// src/services/mailer.rs
//
// Outbound application email over SMTP with STARTTLS. Delivery is never
// retried automatically: a duplicate send is worse than a surfaced
// failure, so the caller decides whether to re-invoke.

use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::common::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Email not configured. Please set SENDER_EMAIL and SENDER_PASSWORD")]
    NotConfigured,

    #[error("Invalid recipient email address: {0}")]
    InvalidRecipient(String),

    #[error("Failed to compose email: {0}")]
    Compose(String),

    #[error("Failed to send email: {0}")]
    Delivery(String),
}

impl From<MailerError> for ApiError {
    fn from(e: MailerError) -> Self {
        match e {
            MailerError::NotConfigured => ApiError::InternalServer(e.to_string()),
            MailerError::InvalidRecipient(_) => ApiError::InvalidRecipient(e.to_string()),
            MailerError::Compose(_) => ApiError::InternalServer(e.to_string()),
            MailerError::Delivery(_) => ApiError::EmailDeliveryFailed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: String,
    pub sender_password: String,
}

#[derive(Debug)]
pub struct MailerService {
    config: Option<MailerConfig>,
}

impl MailerService {
    pub fn new(config: Option<MailerConfig>) -> Self {
        Self { config }
    }

    /// Send the application email with the given artifact attachments.
    /// Attachment paths must already be resolved and verified by the
    /// artifact store.
    pub async fn send_application_email(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        attachment_paths: &[PathBuf],
    ) -> Result<(), MailerError> {
        let config = self.config.as_ref().ok_or(MailerError::NotConfigured)?;

        let from: Mailbox = config
            .sender_email
            .parse()
            .map_err(|_| MailerError::Compose("sender address is not valid".to_string()))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|_| MailerError::InvalidRecipient(recipient.to_string()))?;

        let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));

        for path in attachment_paths {
            let content = tokio::fs::read(path)
                .await
                .map_err(|e| MailerError::Compose(format!("could not read attachment: {}", e)))?;
            let filename = file_name(path);
            let content_type = ContentType::parse("application/octet-stream")
                .map_err(|e| MailerError::Compose(e.to_string()))?;
            multipart = multipart.singlepart(Attachment::new(filename).body(content, content_type));
        }

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(multipart)
            .map_err(|e| MailerError::Compose(e.to_string()))?;

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
                .map_err(|e| MailerError::Delivery(e.to_string()))?
                .port(config.smtp_port)
                .credentials(Credentials::new(
                    config.sender_email.clone(),
                    config.sender_password.clone(),
                ))
                .build();

        match mailer.send(message).await {
            Ok(_) => {
                info!(
                    recipient = %mask_email(recipient),
                    attachments = attachment_paths.len(),
                    "Application email sent"
                );
                Ok(())
            }
            Err(e) => {
                error!(recipient = %mask_email(recipient), error = %e, "SMTP send failed");
                Err(MailerError::Delivery(e.to_string()))
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string())
}

/// Masks email addresses for safe logging
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) => format!("{}***@{}", first, domain),
            None => "***@***.***".to_string(),
        },
        _ => "***@***.***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("user@example.com"), "u***@example.com");
        assert_eq!(mask_email("not-an-email"), "***@***.***");
    }

    #[tokio::test]
    async fn test_unconfigured_mailer_refuses_to_send() {
        let mailer = MailerService::new(None);
        let result = mailer
            .send_application_email("a@b.com", "subject", "body", &[])
            .await;
        assert!(matches!(result, Err(MailerError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_bad_recipient_rejected_before_transport() {
        let mailer = MailerService::new(Some(MailerConfig {
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            sender_email: "sender@example.com".to_string(),
            sender_password: "secret".to_string(),
        }));
        let result = mailer
            .send_application_email("not an address", "subject", "body", &[])
            .await;
        assert!(matches!(result, Err(MailerError::InvalidRecipient(_))));
    }
}
