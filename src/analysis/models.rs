// src/analysis/models.rs

use serde::{Deserialize, Serialize};

/// Structured facts extracted from a job description.
///
/// `job_title` is the only required field; everything else defaults to
/// null or an empty list when the model omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub job_title: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub key_responsibilities: Vec<String>,
}

/// Structured facts extracted from a resume. All fields optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Skill comparison between a job's requirements and a resume.
///
/// Invariant: a skill never appears in both `matching_skills` and
/// `missing_skills`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGap {
    pub matching_skills: Vec<String>,
    pub partial_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Complete analysis payload for one resume / job-description pair.
/// Request-scoped and never persisted; callers carry it between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub job_analysis: JobAnalysis,
    pub resume_analysis: ResumeAnalysis,
    pub skill_gap: SkillGap,
    pub match_percentage: u8,
}
