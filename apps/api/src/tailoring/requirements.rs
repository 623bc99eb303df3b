//! Requirement extraction: turns raw job-description text into `JobRequirements`.
//!
//! This is a fixed rule table (case-insensitive regexes), not NLP. It backs the
//! `PatternClassifier` and can be replaced wholesale by any other `TextClassifier`.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Structured requirements extracted from a job description.
///
/// Each list preserves detection order and never holds duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRequirements {
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    /// Human-readable thresholds such as "3+ years of experience".
    pub experience: Vec<String>,
    /// Degree-level labels such as "Bachelor's Degree".
    pub education: Vec<String>,
}

impl JobRequirements {
    pub fn is_empty(&self) -> bool {
        self.technical_skills.is_empty()
            && self.soft_skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
    }

    /// Technical skills followed by soft skills.
    pub fn skill_keywords(&self) -> impl Iterator<Item = &str> {
        self.technical_skills
            .iter()
            .chain(self.soft_skills.iter())
            .map(String::as_str)
    }
}

pub const BACHELORS_DEGREE: &str = "Bachelor's Degree";
pub const MASTERS_DEGREE: &str = "Master's Degree";

/// (label, pattern); catalog order is detection order.
const TECHNICAL_CATALOG: &[(&str, &str)] = &[
    ("JavaScript", r"(?i)javascript|\bjs\b|frontend|front-end"),
    ("React", r"(?i)react"),
    ("Node.js", r"(?i)\bnode|backend|back-end"),
    ("Python", r"(?i)python"),
];

const SOFT_CATALOG: &[(&str, &str)] = &[
    ("Team Collaboration", r"(?i)team|collaborat"),
    ("Communication", r"(?i)communicat"),
    ("Problem Solving", r"(?i)problem.solv"),
];

const EDUCATION_CATALOG: &[(&str, &str)] = &[
    (BACHELORS_DEGREE, r"(?i)bachelor|\bb\.?s\.?\b|\bb\.?a\.?\b"),
    (MASTERS_DEGREE, r"(?i)master|\bm\.?s\.?\b|\bm\.?a\.?\b"),
];

type Rules = Vec<(&'static str, Regex)>;

fn compile(catalog: &[(&'static str, &str)]) -> Rules {
    catalog
        .iter()
        .map(|&(label, pattern)| {
            let re = Regex::new(pattern).expect("catalog patterns are valid regexes");
            (label, re)
        })
        .collect()
}

fn technical_rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| compile(TECHNICAL_CATALOG))
}

fn soft_rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| compile(SOFT_CATALOG))
}

fn education_rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| compile(EDUCATION_CATALOG))
}

fn experience_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\+?\s+years?\s+(?:of\s+)?experience")
            .expect("experience pattern is a valid regex")
    })
}

/// Digits of the first "N years experience" statement in `text`, if any.
pub(crate) fn first_years_statement(text: &str) -> Option<&str> {
    experience_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts requirements from job-description text. Never fails: a missing
/// signal simply leaves its list empty.
pub fn extract_requirements(job_description: &str) -> JobRequirements {
    let detect = |rules: &Rules| -> Vec<String> {
        rules
            .iter()
            .filter(|(_, re)| re.is_match(job_description))
            .map(|(label, _)| label.to_string())
            .collect()
    };

    let requirements = JobRequirements {
        technical_skills: detect(technical_rules()),
        soft_skills: detect(soft_rules()),
        experience: first_years_statement(job_description)
            .map(|years| vec![format!("{years}+ years of experience")])
            .unwrap_or_default(),
        education: detect(education_rules()),
    };

    debug!(
        technical = requirements.technical_skills.len(),
        soft = requirements.soft_skills.len(),
        experience = requirements.experience.len(),
        education = requirements.education.len(),
        "Extracted job requirements"
    );

    requirements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_catalog_order_experience_and_bachelors() {
        let req = extract_requirements(
            "We need 3+ years experience with Python and React, bachelor's required.",
        );
        assert_eq!(req.technical_skills, vec!["React", "Python"]);
        assert_eq!(req.experience, vec!["3+ years of experience"]);
        assert_eq!(req.education, vec![BACHELORS_DEGREE]);
        assert!(req.soft_skills.is_empty());
    }

    #[test]
    fn test_synonyms_map_to_catalog_names() {
        let req = extract_requirements("Front-end and backend work on a small team.");
        assert_eq!(req.technical_skills, vec!["JavaScript", "Node.js"]);
        assert_eq!(req.soft_skills, vec!["Team Collaboration"]);
    }

    #[test]
    fn test_each_skill_added_at_most_once() {
        let req = extract_requirements("React, ReactJS and more REACT");
        assert_eq!(req.technical_skills, vec!["React"]);
    }

    #[test]
    fn test_soft_skills_follow_catalog_order() {
        let req = extract_requirements(
            "Strong problem-solving, great communication, and you collaborate well.",
        );
        assert_eq!(
            req.soft_skills,
            vec!["Team Collaboration", "Communication", "Problem Solving"]
        );
    }

    #[test]
    fn test_only_first_experience_statement_counts() {
        let req = extract_requirements(
            "5 years of experience in Go. 8+ years experience leading teams preferred.",
        );
        assert_eq!(req.experience, vec!["5+ years of experience"]);
    }

    #[test]
    fn test_singular_year_is_accepted() {
        let req = extract_requirements("At least 1 year experience.");
        assert_eq!(req.experience, vec!["1+ years of experience"]);
    }

    #[test]
    fn test_both_degree_levels_detected() {
        let req = extract_requirements("Bachelor's required, Master's preferred.");
        assert_eq!(req.education, vec![BACHELORS_DEGREE, MASTERS_DEGREE]);
    }

    #[test]
    fn test_abbreviations_need_word_boundaries() {
        let req = extract_requirements("BS in Computer Science");
        assert_eq!(req.education, vec![BACHELORS_DEGREE]);

        // "ma" inside "small" and "ms" inside "teams" must not imply a degree.
        let req = extract_requirements("small teams");
        assert!(req.education.is_empty());
    }

    #[test]
    fn test_no_signals_yields_empty_requirements() {
        let req = extract_requirements("Lorem ipsum dolor sit amet.");
        assert!(req.is_empty());
    }

    #[test]
    fn test_serializes_in_camel_case() {
        let req = JobRequirements {
            technical_skills: vec!["Python".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["technicalSkills"][0], "Python");
        assert!(json["softSkills"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_skill_keywords_lists_technical_then_soft() {
        let req = JobRequirements {
            technical_skills: vec!["React".to_string()],
            soft_skills: vec!["Communication".to_string()],
            ..Default::default()
        };
        let keywords: Vec<&str> = req.skill_keywords().collect();
        assert_eq!(keywords, vec!["React", "Communication"]);
    }
}
