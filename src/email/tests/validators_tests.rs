// src/email/tests/validators_tests.rs

use crate::common::Validator;
use crate::email::models::SendEmailRequest;
use crate::email::validators::{is_valid_email, SendEmailValidator};

fn valid_request() -> SendEmailRequest {
    SendEmailRequest {
        recipient_email: "hiring@example.com".to_string(),
        subject: "Application for Backend Engineer".to_string(),
        body: "Please find my resume and cover letter attached.".to_string(),
        resume_path: "latest_resume.docx".to_string(),
        cover_letter_path: "latest_cover_letter.docx".to_string(),
    }
}

#[test]
fn test_valid_email_addresses() {
    assert!(is_valid_email("user@example.com"));
    assert!(is_valid_email("first.last+tag@sub.example.co"));
    assert!(is_valid_email("u_1%x-y@example.io"));
}

#[test]
fn test_invalid_email_addresses() {
    assert!(!is_valid_email(""));
    assert!(!is_valid_email("not-an-email"));
    assert!(!is_valid_email("user@"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("user@example"));
    assert!(!is_valid_email("user name@example.com"));
}

#[test]
fn test_send_email_validator_valid_request() {
    let result = SendEmailValidator.validate(&valid_request());
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
}

#[test]
fn test_send_email_validator_empty_subject() {
    let mut request = valid_request();
    request.subject = "  ".to_string();

    let result = SendEmailValidator.validate(&request);
    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.field == "subject"));
}

#[test]
fn test_send_email_validator_missing_paths() {
    let mut request = valid_request();
    request.resume_path = String::new();
    request.cover_letter_path = String::new();

    let result = SendEmailValidator.validate(&request);
    assert!(!result.is_valid);
    assert!(result.errors.iter().any(|e| e.field == "resume_path"));
    assert!(result
        .errors
        .iter()
        .any(|e| e.field == "cover_letter_path"));
}
