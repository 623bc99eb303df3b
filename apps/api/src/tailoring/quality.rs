//! Quality evaluation: a fixed battery of heuristic checks run on the tailored
//! resume before it is returned.
//!
//! Checks: keyword stuffing, fabricated experience, mixed verb tenses, and
//! relevance (missing technical requirements). Each yields at most one issue.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tailoring::requirements::JobRequirements;
use crate::tailoring::text::{contains_ignore_case, count_ignore_case};

/// More occurrences than this counts as stuffing.
const MAX_KEYWORD_OCCURRENCES: usize = 3;
/// Sentences this short are ignored by the fabrication check.
const MIN_FABRICATION_SENTENCE_LEN: usize = 20;
/// Both tense counts must exceed this to flag inconsistency.
const TENSE_MIX_THRESHOLD: usize = 3;
const ISSUE_PENALTY: f32 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub passes: bool,
    pub issues: Vec<String>,
    /// `1.0 - 0.2 * issues`; not clamped, so it can go negative.
    pub score: f32,
}

impl QualityVerdict {
    fn from_issues(issues: Vec<String>) -> Self {
        Self {
            passes: issues.is_empty(),
            score: 1.0 - ISSUE_PENALTY * issues.len() as f32,
            issues,
        }
    }

    /// All issues joined with "; ".
    pub fn reason(&self) -> String {
        self.issues.join("; ")
    }
}

/// Runs every check against the tailored text. Never fails.
pub fn evaluate_quality(
    original: &str,
    tailored: &str,
    requirements: &JobRequirements,
) -> QualityVerdict {
    let issues = [
        check_keyword_stuffing(tailored, requirements),
        check_fabrication(original, tailored),
        check_style_consistency(tailored),
        check_relevance(tailored, requirements),
    ]
    .into_iter()
    .flatten()
    .collect();

    QualityVerdict::from_issues(issues)
}

/// Reports only the first over-used skill.
fn check_keyword_stuffing(tailored: &str, requirements: &JobRequirements) -> Option<String> {
    requirements.skill_keywords().find_map(|skill| {
        let count = count_ignore_case(tailored, skill);
        (count > MAX_KEYWORD_OCCURRENCES)
            .then(|| format!("Excessive use of keyword \"{skill}\" ({count} times)"))
    })
}

fn sentence_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence pattern is a valid regex"))
}

fn years_claim() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\d+ years? (?:of )?experience").expect("years pattern is a valid regex")
    })
}

/// Flags the first new sentence that claims an explicit number of years of experience.
fn check_fabrication(original: &str, tailored: &str) -> Option<String> {
    let original_sentences: Vec<String> = sentence_splitter()
        .split(original)
        .map(|s| s.trim().to_lowercase())
        .collect();

    sentence_splitter()
        .split(tailored)
        .map(str::trim)
        .find(|sentence| {
            let lower = sentence.to_lowercase();
            !original_sentences.iter().any(|orig| orig.contains(&lower))
                && years_claim().is_match(sentence)
                && sentence.chars().count() > MIN_FABRICATION_SENTENCE_LEN
        })
        .map(|sentence| format!("Potentially fabricated experience: \"{sentence}\""))
}

fn past_tense() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(developed|created|managed|led|designed|implemented)\b")
            .expect("past tense pattern is a valid regex")
    })
}

fn present_tense() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(develop|create|manage|lead|design|implement)\b")
            .expect("present tense pattern is a valid regex")
    })
}

fn check_style_consistency(tailored: &str) -> Option<String> {
    let bullets: Vec<&str> = tailored
        .lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with("- "))
        .collect();

    let past = bullets.iter().filter(|b| past_tense().is_match(b)).count();
    let present = bullets.iter().filter(|b| present_tense().is_match(b)).count();

    (past > TENSE_MIX_THRESHOLD && present > TENSE_MIX_THRESHOLD)
        .then(|| "Inconsistent verb tenses in resume (mixed past and present)".to_string())
}

fn check_relevance(tailored: &str, requirements: &JobRequirements) -> Option<String> {
    let missing: Vec<&str> = requirements
        .technical_skills
        .iter()
        .filter(|skill| !contains_ignore_case(tailored, skill))
        .map(String::as_str)
        .collect();

    (!missing.is_empty())
        .then(|| format!("Resume missing key job requirements: {}", missing.join(", ")))
}
