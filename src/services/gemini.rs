// src/services/gemini.rs
//
// Client for the Google Gemini generateContent API. The model is used as
// an opaque fact extractor and prose writer; every structured response is
// validated against the analysis schema on receipt.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::analysis::models::{JobAnalysis, ResumeAnalysis};
use crate::common::ApiError;
use crate::documents::models::DocumentKind;

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("AI service not configured. Please set GEMINI_API_KEY")]
    NotConfigured,

    /// Transient transport failure (network error, timeout, 429, 5xx).
    /// The only retryable kind.
    #[error("AI request failed: {0}")]
    Transport(String),

    /// Upstream rejected the request outright (non-transient 4xx).
    #[error("AI service rejected the request: {0}")]
    Upstream(String),

    /// The model answered, but not in the expected shape. Retrying will
    /// not fix a parsing problem, so this is never retried.
    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
}

impl GeminiError {
    pub fn is_transient(&self) -> bool {
        matches!(self, GeminiError::Transport(_))
    }
}

impl From<GeminiError> for ApiError {
    fn from(e: GeminiError) -> Self {
        match e {
            GeminiError::NotConfigured => ApiError::InternalServer(e.to_string()),
            GeminiError::Transport(_) | GeminiError::Upstream(_) => {
                ApiError::AiServiceUnavailable(e.to_string())
            }
            GeminiError::MalformedResponse(_) => ApiError::MalformedAiResponse(e.to_string()),
        }
    }
}

/// Bounded retry policy for transient failures: one initial attempt plus
/// at most `max_retries` re-attempts with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `op` under the policy, retrying only transient errors.
pub(crate) async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<T, GeminiError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, GeminiError>>,
{
    let mut last_error = None;

    for attempt in 0..=policy.max_retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                warn!(
                    attempt = attempt + 1,
                    max_attempts = policy.max_retries + 1,
                    error = %e,
                    "Gemini request failed with a transient error"
                );
                last_error = Some(e);

                if attempt < policy.max_retries {
                    tokio::time::sleep(policy.backoff_delay(attempt)).await;
                }
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| GeminiError::Transport("unknown error".to_string())))
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug)]
pub struct GeminiService {
    api_key: Option<String>,
    base_url: String,
    model: String,
    retry: RetryPolicy,
    client: Client,
}

impl GeminiService {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url,
            model,
            retry: RetryPolicy::default(),
            client,
        }
    }

    /// Analyze a job description into structured job facts.
    ///
    /// `job_title` is the only required field; the response is rejected as
    /// malformed without it. Optional fields absent from the response stay
    /// absent, they are never substituted with placeholders.
    pub async fn analyze_job_description(
        &self,
        job_text: &str,
    ) -> Result<JobAnalysis, GeminiError> {
        let prompt = format!(
            r#"Analyze the following job description and extract the information in JSON format.

Job Description:
{job_text}

Please provide the response in the following JSON structure:
{{
    "job_title": "extracted job title",
    "company_name": "company name if available, otherwise null",
    "contact_email": "hiring manager or recruiter email if available, otherwise null",
    "required_skills": ["skill1", "skill2", ...],
    "preferred_skills": ["skill1", "skill2", ...],
    "key_responsibilities": ["responsibility1", "responsibility2", ...]
}}

Focus on technical skills, soft skills, tools, frameworks, and technologies.
Extract any contact email addresses mentioned in the job posting.
Be specific and comprehensive. Return only valid JSON."#
        );

        let raw = self.generate(&prompt).await?;
        let cleaned = strip_code_fences(&raw);

        let analysis: JobAnalysis = serde_json::from_str(&cleaned).map_err(|e| {
            GeminiError::MalformedResponse(format!(
                "job analysis did not match the expected schema: {}",
                e
            ))
        })?;

        if analysis.job_title.trim().is_empty() {
            return Err(GeminiError::MalformedResponse(
                "job analysis is missing the required job_title field".to_string(),
            ));
        }

        debug!(job_title = %analysis.job_title, "Job description analyzed");
        Ok(analysis)
    }

    /// Analyze a resume into structured candidate facts. Every field is
    /// optional; missing ones default to null or an empty list.
    pub async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeAnalysis, GeminiError> {
        let prompt = format!(
            r#"Analyze the following resume and extract the information in JSON format.

Resume:
{resume_text}

Please provide the response in the following JSON structure:
{{
    "candidate_name": "candidate name if available, otherwise null",
    "skills": ["skill1", "skill2", ...],
    "experience": ["experience1", "experience2", ...],
    "education": ["degree1", "degree2", ...],
    "summary": "brief professional summary"
}}

Focus on technical skills, soft skills, work experience, and educational background.
Be comprehensive and specific. Return only valid JSON."#
        );

        let raw = self.generate(&prompt).await?;
        let cleaned = strip_code_fences(&raw);

        let analysis: ResumeAnalysis = serde_json::from_str(&cleaned).map_err(|e| {
            GeminiError::MalformedResponse(format!(
                "resume analysis did not match the expected schema: {}",
                e
            ))
        })?;

        Ok(analysis)
    }

    /// Ask the model for tailored document prose (markdown) for the given
    /// document kind. Same retry and validation policy as analysis.
    pub async fn generate_content(
        &self,
        kind: DocumentKind,
        resume_text: &str,
        job_text: &str,
    ) -> Result<String, GeminiError> {
        let prompt = match kind {
            DocumentKind::Resume => format!(
                r#"Create a tailored, professional resume that highlights the candidate's relevant experience and skills for the specific job description.

Original Resume:
{resume_text}

Target Job Description:
{job_text}

CRITICAL INSTRUCTIONS:
1. Output ONLY the resume content - NO introductions, explanations, or preambles
2. Start directly with the candidate's name from the resume
3. Use ACTUAL information from the resume (real name, email, phone) - NO placeholders like [Your Name], [Your Email]
4. Use **bold** for important keywords that match the job description
5. Structure: Professional Summary, Skills, Experience, Education
6. Make it ATS-friendly with clear section headers
7. Keep content truthful - only reorganize and emphasize
8. Use markdown formatting: **bold** for emphasis, ## for section headers

Generate the resume now:"#
            ),
            DocumentKind::CoverLetter => format!(
                r#"Write a compelling, professional cover letter based on the candidate's resume and the job description.

Resume:
{resume_text}

Job Description:
{job_text}

CRITICAL INSTRUCTIONS:
1. Output ONLY the cover letter body - NO placeholders like [Your Name], [Your Email], [Date]
2. Use ACTUAL information from the resume (real name, email, phone if mentioned)
3. Extract company name and job title from the job description
4. Start directly with the actual date (today's date)
5. Use **bold** for important keywords and skills that match the job requirements
6. Structure: Date, Greeting, Opening paragraph, 2-3 body paragraphs, Closing
7. Keep it professional, concise (3-4 paragraphs), and authentic
8. End with "Sincerely," followed by the candidate's actual name from resume

Format as a proper business letter with actual information extracted from the documents.

Generate the cover letter now:"#
            ),
        };

        let content = self.generate(&prompt).await?;
        let content = strip_preamble(&content);

        if content.is_empty() {
            return Err(GeminiError::MalformedResponse(
                "model returned no document content".to_string(),
            ));
        }

        info!(kind = %kind, chars = content.len(), "Document content generated");
        Ok(content)
    }

    /// Send a single prompt under the retry policy and return the raw
    /// model text.
    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::NotConfigured)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending Gemini request");

        retry_transient(&self.retry, || self.request_once(api_key, &request)).await
    }

    /// Make a single API request
    async fn request_once(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(GeminiError::Transport(format!("HTTP {}", status)));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Gemini API request failed");
            return Err(GeminiError::Upstream(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::MalformedResponse(e.to_string()))?;

        body.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.trim().to_string())
            .ok_or_else(|| {
                GeminiError::MalformedResponse("no candidates in response".to_string())
            })
    }
}

/// Strip markdown code fences the model sometimes wraps JSON in.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```json") || trimmed.starts_with("```") {
        trimmed
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Remove conversational preambles ("Here's a tailored resume...") the
/// model emits despite instructions.
fn strip_preamble(content: &str) -> String {
    const PREAMBLES: &[&str] = &[
        "here's a tailored resume",
        "here is a tailored resume",
        "below is a tailored resume",
        "this is a tailored resume",
        "i've created a tailored resume",
        "here's a cover letter",
        "here is a cover letter",
        "below is a cover letter",
        "this is a cover letter",
        "i've created a cover letter",
    ];

    let content = content.trim();
    let lowered = content.to_lowercase();

    for preamble in PREAMBLES {
        if lowered.starts_with(preamble) {
            // A reply that is nothing but the preamble line carries no
            // document content at all.
            return match content.find('\n') {
                Some(first_break) => content[first_break..].trim().to_string(),
                None => String::new(),
            };
        }
    }

    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_strip_code_fences_json_block() {
        let raw = "```json\n{\"job_title\": \"Engineer\"}\n```";
        assert_eq!(strip_code_fences(raw), "{\"job_title\": \"Engineer\"}");
    }

    #[test]
    fn test_strip_code_fences_plain_text_untouched() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_preamble_removes_first_line() {
        let content = "Here's a tailored resume for you:\n\n## Jane Doe\nEngineer";
        assert_eq!(strip_preamble(content), "## Jane Doe\nEngineer");
    }

    #[test]
    fn test_strip_preamble_single_line_reply_yields_empty() {
        // No newline after the preamble means the model sent no content;
        // the caller's emptiness check turns this into a malformed reply.
        assert_eq!(strip_preamble("Here's a tailored resume for you:"), "");
    }

    #[test]
    fn test_strip_preamble_keeps_clean_content() {
        let content = "## Jane Doe\nEngineer";
        assert_eq!(strip_preamble(content), content);
    }

    #[test]
    fn test_job_analysis_missing_title_is_malformed() {
        let cleaned = strip_code_fences("{\"required_skills\": [\"Rust\"]}");
        let parsed: Result<JobAnalysis, _> = serde_json::from_str(&cleaned);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_job_analysis_optional_fields_default() {
        let parsed: JobAnalysis =
            serde_json::from_str("{\"job_title\": \"Backend Engineer\"}").unwrap();
        assert_eq!(parsed.job_title, "Backend Engineer");
        assert!(parsed.company_name.is_none());
        assert!(parsed.contact_email.is_none());
        assert!(parsed.required_skills.is_empty());
        assert!(parsed.preferred_skills.is_empty());
        assert!(parsed.key_responsibilities.is_empty());
    }

    #[tokio::test]
    async fn test_transient_errors_retried_twice_then_surface() {
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::ZERO,
        };
        let attempts = Cell::new(0u32);

        let result: Result<(), GeminiError> = retry_transient(&policy, || {
            attempts.set(attempts.get() + 1);
            async { Err(GeminiError::Transport("connection timed out".to_string())) }
        })
        .await;

        // Initial attempt plus exactly 2 retries, never a 3rd retry.
        assert_eq!(attempts.get(), 3);
        assert!(matches!(result, Err(GeminiError::Transport(_))));
    }

    #[tokio::test]
    async fn test_malformed_response_never_retried() {
        let policy = RetryPolicy::default();
        let attempts = Cell::new(0u32);

        let result: Result<(), GeminiError> = retry_transient(&policy, || {
            attempts.set(attempts.get() + 1);
            async { Err(GeminiError::MalformedResponse("bad JSON".to_string())) }
        })
        .await;

        assert_eq!(attempts.get(), 1);
        assert!(matches!(result, Err(GeminiError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_failure() {
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::ZERO,
        };
        let attempts = Cell::new(0u32);

        let result = retry_transient(&policy, || {
            attempts.set(attempts.get() + 1);
            let n = attempts.get();
            async move {
                if n < 2 {
                    Err(GeminiError::Transport("flaky".to_string()))
                } else {
                    Ok("answer".to_string())
                }
            }
        })
        .await;

        assert_eq!(attempts.get(), 2);
        assert_eq!(result.unwrap(), "answer");
    }
}
