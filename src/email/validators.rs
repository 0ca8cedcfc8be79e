// src/email/validators.rs

use regex::Regex;
use std::sync::OnceLock;

use crate::common::{ValidationResult, Validator};
use crate::email::models::SendEmailRequest;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email regex is valid")
    })
}

/// Syntactic email address check.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub struct SendEmailValidator;

impl Validator<SendEmailRequest> for SendEmailValidator {
    fn validate(&self, request: &SendEmailRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if request.subject.trim().is_empty() {
            result.add_error("subject", "Subject cannot be empty");
        }

        if request.body.trim().is_empty() {
            result.add_error("body", "Body cannot be empty");
        }

        if request.resume_path.trim().is_empty() {
            result.add_error("resume_path", "Resume path is required");
        }

        if request.cover_letter_path.trim().is_empty() {
            result.add_error("cover_letter_path", "Cover letter path is required");
        }

        result
    }
}
