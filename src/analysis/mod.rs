// src/analysis/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod skill_gap;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use models::*;
pub use routes::analysis_routes;

use crate::services::gemini::{GeminiError, GeminiService};

/// Run the full analysis pipeline on extracted texts: job facts, resume
/// facts, then the local deterministic skill gap.
pub async fn analyze_documents(
    gemini: &GeminiService,
    resume_text: &str,
    job_text: &str,
) -> Result<AnalysisResult, GeminiError> {
    let job_analysis = gemini.analyze_job_description(job_text).await?;
    let resume_analysis = gemini.analyze_resume(resume_text).await?;

    let skill_gap = skill_gap::compute_gap(
        &job_analysis.required_skills,
        &job_analysis.preferred_skills,
        &resume_analysis.skills,
    );
    let match_percentage = skill_gap::match_percentage(&skill_gap);

    Ok(AnalysisResult {
        job_analysis,
        resume_analysis,
        skill_gap,
        match_percentage,
    })
}
