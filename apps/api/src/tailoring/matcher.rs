//! Skill matching: compares a resume against `JobRequirements`.
//!
//! Two modes:
//! - text mode scans the raw resume for each requirement (substring presence);
//! - structured mode compares requirement skills against the parsed skill list
//!   with bidirectional containment, so "JavaScript" matches "JavaScript (ES6)".
//!
//! One `SkillMatch` is emitted per requirement, technical first, then soft,
//! then experience, then education.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::resume::StructuredResume;
use crate::tailoring::requirements::{first_years_statement, JobRequirements};
use crate::tailoring::text::contains_ignore_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Technical,
    Soft,
    Experience,
    Education,
}

/// What the generator should do with a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchAction {
    /// Present in the resume; strengthen the existing mention.
    Enhance,
    /// Missing; list it as an additional skill.
    Add,
    /// Satisfied; draw attention to it.
    Highlight,
    /// Missing education requirement; left to the candidate.
    Consider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// Skill name or requirement text, exactly as extracted.
    pub skill: String,
    pub category: MatchCategory,
    pub action: MatchAction,
    pub confidence: f32, // 0.0 – 1.0
    pub found: bool,
}

impl SkillMatch {
    fn new(
        skill: &str,
        category: MatchCategory,
        action: MatchAction,
        confidence: f32,
        found: bool,
    ) -> Self {
        Self {
            skill: skill.to_string(),
            category,
            action,
            confidence,
            found,
        }
    }
}

/// The two resume representations the matcher accepts.
#[derive(Debug, Clone, Copy)]
pub enum ResumeInput<'a> {
    Text(&'a str),
    Structured(&'a StructuredResume),
}

/// (found, missing) confidences per category and mode.
const TEXT_TECHNICAL: (f32, f32) = (0.8, 0.6);
const TEXT_SOFT: (f32, f32) = (0.7, 0.5);
const STRUCTURED_TECHNICAL: (f32, f32) = (0.9, 0.7);
const STRUCTURED_SOFT: (f32, f32) = (0.85, 0.6);
const EXPERIENCE: (f32, f32) = (0.7, 0.5);
const EDUCATION: (f32, f32) = (0.9, 0.4);

/// Dispatches to text or structured matching.
pub fn match_skills(resume: ResumeInput<'_>, requirements: &JobRequirements) -> Vec<SkillMatch> {
    let matches = match resume {
        ResumeInput::Text(text) => match_text(text, requirements),
        ResumeInput::Structured(structured) => match_structured(structured, requirements),
    };
    debug!("Produced {} skill matches", matches.len());
    matches
}

/// Text mode: substring presence in the raw resume, plus experience and education.
pub fn match_text(resume: &str, requirements: &JobRequirements) -> Vec<SkillMatch> {
    let mut matches = Vec::new();

    push_skill_matches(
        &mut matches,
        &requirements.technical_skills,
        MatchCategory::Technical,
        TEXT_TECHNICAL,
        |skill| contains_ignore_case(resume, skill),
    );
    push_skill_matches(
        &mut matches,
        &requirements.soft_skills,
        MatchCategory::Soft,
        TEXT_SOFT,
        |skill| contains_ignore_case(resume, skill),
    );

    let resume_years = first_years_statement(resume).and_then(|y| y.parse::<u64>().ok());
    for requirement in &requirements.experience {
        // Requirements without a parseable year count are skipped, not errors.
        let Some(required_years) = required_years(requirement) else {
            debug!("Skipping experience requirement without years: {requirement:?}");
            continue;
        };

        let skill_match = match resume_years {
            Some(years) => {
                let action = if years >= required_years {
                    MatchAction::Highlight
                } else {
                    MatchAction::Enhance
                };
                SkillMatch::new(requirement, MatchCategory::Experience, action, EXPERIENCE.0, true)
            }
            None => SkillMatch::new(
                requirement,
                MatchCategory::Experience,
                MatchAction::Add,
                EXPERIENCE.1,
                false,
            ),
        };
        matches.push(skill_match);
    }

    for degree in &requirements.education {
        let skill_match = if contains_ignore_case(resume, degree) {
            SkillMatch::new(
                degree,
                MatchCategory::Education,
                MatchAction::Highlight,
                EDUCATION.0,
                true,
            )
        } else {
            SkillMatch::new(
                degree,
                MatchCategory::Education,
                MatchAction::Consider,
                EDUCATION.1,
                false,
            )
        };
        matches.push(skill_match);
    }

    matches
}

/// Structured mode: technical and soft skills against the parsed skill list.
pub fn match_structured(resume: &StructuredResume, requirements: &JobRequirements) -> Vec<SkillMatch> {
    let resume_skills: Vec<String> = resume
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    let has_skill = |skill: &str| {
        let skill = skill.to_lowercase();
        resume_skills
            .iter()
            .any(|own| own.contains(&skill) || skill.contains(own.as_str()))
    };

    let mut matches = Vec::new();
    push_skill_matches(
        &mut matches,
        &requirements.technical_skills,
        MatchCategory::Technical,
        STRUCTURED_TECHNICAL,
        has_skill,
    );
    push_skill_matches(
        &mut matches,
        &requirements.soft_skills,
        MatchCategory::Soft,
        STRUCTURED_SOFT,
        has_skill,
    );
    matches
}

fn push_skill_matches(
    matches: &mut Vec<SkillMatch>,
    skills: &[String],
    category: MatchCategory,
    (found_confidence, missing_confidence): (f32, f32),
    is_present: impl Fn(&str) -> bool,
) {
    for skill in skills {
        let skill_match = if is_present(skill) {
            SkillMatch::new(skill, category, MatchAction::Enhance, found_confidence, true)
        } else {
            SkillMatch::new(skill, category, MatchAction::Add, missing_confidence, false)
        };
        matches.push(skill_match);
    }
}

/// Leading year count of a requirement such as "5+ years of experience".
fn required_years(requirement: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\+?\s+years?").expect("years pattern is a valid regex")
    });
    re.captures(requirement)?.get(1)?.as_str().parse().ok()
}
