// src/analysis/tests/skill_gap_tests.rs

use crate::analysis::skill_gap::{compute_gap, match_percentage};

fn skills(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_python_sql_scenario() {
    let gap = compute_gap(&skills(&["Python", "SQL"]), &[], &skills(&["Python"]));

    assert_eq!(gap.matching_skills, vec!["Python"]);
    assert_eq!(gap.missing_skills, vec!["SQL"]);
    assert!(gap.partial_skills.is_empty());
    assert_eq!(match_percentage(&gap), 50);
}

#[test]
fn test_empty_inputs_give_zero_percentage() {
    let gap = compute_gap(&[], &[], &[]);

    assert!(gap.matching_skills.is_empty());
    assert!(gap.partial_skills.is_empty());
    assert!(gap.missing_skills.is_empty());
    assert_eq!(match_percentage(&gap), 0);
}

#[test]
fn test_matching_is_case_insensitive_and_preserves_job_casing() {
    let gap = compute_gap(
        &skills(&["RUST", "PostgreSQL"]),
        &[],
        &skills(&["rust", "postgresql"]),
    );

    assert_eq!(gap.matching_skills, vec!["RUST", "PostgreSQL"]);
    assert!(gap.missing_skills.is_empty());
    assert_eq!(match_percentage(&gap), 100);
}

#[test]
fn test_matching_and_missing_are_disjoint() {
    let gap = compute_gap(
        &skills(&["Rust", "SQL", "Docker"]),
        &skills(&["Rust", "Kubernetes"]),
        &skills(&["Rust", "SQL"]),
    );

    for matched in &gap.matching_skills {
        assert!(
            !gap.missing_skills.contains(matched),
            "{} appears in both matching and missing",
            matched
        );
    }
}

#[test]
fn test_partial_match_leaves_missing_list() {
    let gap = compute_gap(
        &skills(&["PostgreSQL"]),
        &[],
        &skills(&["Postgres", "PostgreSQL administration"]),
    );

    // "PostgreSQL" is contained in "postgresql administration".
    assert!(gap.matching_skills.is_empty());
    assert_eq!(gap.partial_skills.len(), 1);
    assert!(gap.partial_skills[0].starts_with("PostgreSQL (similar to "));
    assert!(gap.missing_skills.is_empty());
}

#[test]
fn test_short_names_never_count_as_partial() {
    // Both sides must be longer than 3 characters for a substring match.
    let gap = compute_gap(&skills(&["Go"]), &[], &skills(&["Google Cloud"]));

    assert!(gap.partial_skills.is_empty());
    assert_eq!(gap.missing_skills, vec!["Go"]);
}

#[test]
fn test_preferred_skills_participate_and_duplicates_collapse() {
    let gap = compute_gap(
        &skills(&["Rust"]),
        &skills(&["rust", "Terraform"]),
        &skills(&["Rust"]),
    );

    assert_eq!(gap.matching_skills, vec!["Rust"]);
    assert_eq!(gap.missing_skills, vec!["Terraform"]);
    assert_eq!(match_percentage(&gap), 50);
}

#[test]
fn test_percentage_always_in_range() {
    let cases: Vec<(Vec<String>, Vec<String>)> = vec![
        (skills(&["A", "B", "C"]), vec![]),
        (skills(&["A"]), skills(&["A"])),
        (vec![], skills(&["A", "B"])),
        (skills(&["Rust", "SQL", "Docker", "Kafka"]), skills(&["Rust"])),
    ];

    for (job, resume) in cases {
        let gap = compute_gap(&job, &[], &resume);
        let pct = match_percentage(&gap);
        assert!(pct <= 100);
    }
}

#[test]
fn test_whitespace_trimmed_before_comparison() {
    let gap = compute_gap(&skills(&["  Rust  "]), &[], &skills(&["rust"]));
    assert_eq!(gap.matching_skills, vec!["Rust"]);
}
