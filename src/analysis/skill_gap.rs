// src/analysis/skill_gap.rs
//
// Deterministic skill-gap comparison. Matching is case-insensitive exact
// equality; a partial match pairs a missing job skill with a resume
// skill whose lowercased name contains (or is contained by) it. Original
// casing from the job description is preserved in the output lists.

use std::collections::HashSet;

use super::models::SkillGap;

/// Compare job skills (required then preferred, deduplicated) against
/// resume skills.
pub fn compute_gap(
    required_skills: &[String],
    preferred_skills: &[String],
    resume_skills: &[String],
) -> SkillGap {
    // (lowercased, original) pairs in first-seen order.
    let mut job_norm: Vec<(String, String)> = Vec::new();
    let mut seen = HashSet::new();
    for skill in required_skills.iter().chain(preferred_skills) {
        let original = skill.trim();
        let key = original.to_lowercase();
        if !key.is_empty() && seen.insert(key.clone()) {
            job_norm.push((key, original.to_string()));
        }
    }

    let mut resume_norm: Vec<(String, String)> = Vec::new();
    let mut seen = HashSet::new();
    for skill in resume_skills {
        let original = skill.trim();
        let key = original.to_lowercase();
        if !key.is_empty() && seen.insert(key.clone()) {
            resume_norm.push((key, original.to_string()));
        }
    }
    let resume_keys: HashSet<&str> = resume_norm.iter().map(|(k, _)| k.as_str()).collect();

    let mut matching_skills = Vec::new();
    let mut unmatched: Vec<(String, String)> = Vec::new();
    for (key, original) in job_norm {
        if resume_keys.contains(key.as_str()) {
            matching_skills.push(original);
        } else {
            unmatched.push((key, original));
        }
    }

    // Substring-similar skills count as partial and leave the missing
    // list; everything else stays missing.
    let mut partial_skills = Vec::new();
    let mut missing_skills = Vec::new();
    for (job_key, job_original) in unmatched {
        let similar = resume_norm.iter().find(|(resume_key, _)| {
            job_key.len() > 3
                && resume_key.len() > 3
                && (job_key.contains(resume_key.as_str()) || resume_key.contains(job_key.as_str()))
        });

        match similar {
            Some((_, resume_original)) => {
                partial_skills.push(format!("{} (similar to {})", job_original, resume_original));
            }
            None => missing_skills.push(job_original),
        }
    }

    SkillGap {
        matching_skills,
        partial_skills,
        missing_skills,
    }
}

/// Match percentage: `round(100 * |matching| / max(1, |matching| +
/// |missing|))`, clamped to [0, 100]. Both lists empty yields 0.
pub fn match_percentage(gap: &SkillGap) -> u8 {
    let matching = gap.matching_skills.len() as f64;
    let missing = gap.missing_skills.len() as f64;
    let denominator = (matching + missing).max(1.0);
    let percentage = (100.0 * matching / denominator).round();
    percentage.clamp(0.0, 100.0) as u8
}
