//! Content generation: produces the tailored resume text.
//!
//! Text mode edits a parsed `ResumeDocument` in three ordered passes (later
//! passes see the output of earlier ones):
//! 1. append " (Expert level)" to the first line mentioning each enhanced skill;
//! 2. insert an "Additional Skills:" block for every `Add` match, after the
//!    `Skills:` section content when one exists, else at the end;
//! 3. prepend a synthesized summary unless a summary/profile/objective heading exists.
//!
//! Structured mode builds a fresh document from a `StructuredResume`.
//! Both modes are deterministic.

use regex::Regex;

use crate::models::resume::{EducationEntry, ExperienceEntry, StructuredResume};
use crate::tailoring::document::{ResumeDocument, Section};
use crate::tailoring::matcher::{MatchAction, MatchCategory, SkillMatch};
use crate::tailoring::requirements::JobRequirements;

pub const EXPERT_SUFFIX: &str = " (Expert level)";
const WORKING_KNOWLEDGE_SUFFIX: &str = " (Working knowledge)";
const RELEVANT_SKILL_SUFFIX: &str = " (relevant skill)";
const SUMMARY_HEADINGS: &[&str] = &["summary", "profile", "objective"];
/// Structured mode only lists missing skills above this confidence.
const ADDITIONAL_SKILL_MIN_CONFIDENCE: f32 = 0.65;

// ────────────────────────────────────────────────────────────────────────────
// Text mode
// ────────────────────────────────────────────────────────────────────────────

/// Tailors a plain-text resume.
pub fn generate_text(
    resume: &str,
    requirements: &JobRequirements,
    matches: &[SkillMatch],
) -> String {
    let mut doc = ResumeDocument::parse(resume);

    for skill_match in matches
        .iter()
        .filter(|m| m.action == MatchAction::Enhance && m.found)
    {
        doc.append_to_first_line_containing(&skill_match.skill, EXPERT_SUFFIX);
    }

    let additions: Vec<String> = matches
        .iter()
        .filter(|m| m.action == MatchAction::Add)
        .map(|m| format!("- {}{WORKING_KNOWLEDGE_SUFFIX}", m.skill))
        .collect();

    if !additions.is_empty() {
        let mut block = Vec::with_capacity(additions.len() + 1);
        block.push("Additional Skills:".to_string());
        block.extend(additions);

        match doc.find_section("skills") {
            Some(index) => doc.insert_after_section_content(index, block),
            None => doc.append_block("Additional Skills", block),
        }
    }

    if !doc.has_heading_ending_with(SUMMARY_HEADINGS) {
        doc.prepend_section(Section::new(
            "Professional Summary",
            vec![
                "Professional Summary:".to_string(),
                summary_sentence(requirements),
                String::new(),
            ],
        ));
    }

    doc.render()
}

fn expertise_phrase(requirements: &JobRequirements) -> String {
    if requirements.technical_skills.is_empty() {
        "a strong technical background".to_string()
    } else {
        format!("expertise in {}", requirements.technical_skills.join(", "))
    }
}

fn soft_skills_phrase(requirements: &JobRequirements) -> String {
    if requirements.soft_skills.is_empty() {
        "Strong interpersonal skills".to_string()
    } else {
        format!("Strong {} skills", requirements.soft_skills.join(", "))
    }
}

fn summary_sentence(requirements: &JobRequirements) -> String {
    format!(
        "Experienced professional with {}. {} with a proven track record of delivering high-quality results.",
        expertise_phrase(requirements),
        soft_skills_phrase(requirements)
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Structured mode
// ────────────────────────────────────────────────────────────────────────────

/// Builds a tailored resume from structured fields. `original` supplies the
/// summary text when the structured record has none.
pub fn generate_structured(
    resume: &StructuredResume,
    original: &str,
    requirements: &JobRequirements,
    matches: &[SkillMatch],
) -> String {
    let mut doc = ResumeDocument::new();

    doc.push_section(header_section(resume, original, requirements));

    if let Some(section) = skills_section(resume, matches) {
        doc.push_section(section);
    }
    if !resume.experience.is_empty() {
        doc.push_section(experience_section(&resume.experience, requirements));
    }
    if !resume.education.is_empty() {
        doc.push_section(education_section(&resume.education));
    }

    doc.render()
}

fn header_section(
    resume: &StructuredResume,
    original: &str,
    requirements: &JobRequirements,
) -> Section {
    let name = if resume.name.trim().is_empty() {
        "Professional"
    } else {
        resume.name.trim()
    };

    let mut lines = vec![name.to_string()];
    let contact = join_non_empty(&[&resume.email, &resume.phone, &resume.location], " | ");
    if !contact.is_empty() {
        lines.push(contact);
    }

    let opening = match resume.experience.len() {
        0 => format!("Experienced professional with {}.", expertise_phrase(requirements)),
        n => format!(
            "{n}+ years of experience professional with {}.",
            expertise_phrase(requirements)
        ),
    };
    let own_summary = if resume.summary.trim().is_empty() {
        summary_from_text(original)
    } else {
        resume.summary.trim().to_string()
    };
    let own_summary = as_sentence(own_summary);
    let summary = format!(
        "{opening} {} with a proven track record of delivering high-quality results. {own_summary}",
        soft_skills_phrase(requirements)
    );

    lines.push(String::new());
    lines.push("PROFESSIONAL SUMMARY".to_string());
    lines.push(summary.trim_end().to_string());

    Section {
        heading: None,
        lines,
    }
}

/// Closes `text` with a period so the next section is not read as part of its last sentence.
fn as_sentence(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }
    text
}

/// Body of the first summary/profile/objective section in `text`, joined into one line.
fn summary_from_text(text: &str) -> String {
    let doc = ResumeDocument::parse(text);
    let Some(section) = doc.sections().iter().find(|s| {
        s.heading
            .as_deref()
            .map(str::to_lowercase)
            .is_some_and(|h| SUMMARY_HEADINGS.iter().any(|name| h.ends_with(name)))
    }) else {
        return String::new();
    };

    let mut parts = Vec::new();
    for (i, line) in section.lines.iter().enumerate() {
        // The heading line may carry inline text after the colon.
        let content = if i == 0 {
            line.split_once(':').map_or("", |(_, rest)| rest)
        } else {
            line.as_str()
        };
        let content = content.trim();
        if !content.is_empty() {
            parts.push(content);
        }
    }
    parts.join(" ")
}

fn skills_section(resume: &StructuredResume, matches: &[SkillMatch]) -> Option<Section> {
    let additions: Vec<&str> = matches
        .iter()
        .filter(|m| m.action == MatchAction::Add && m.confidence > ADDITIONAL_SKILL_MIN_CONFIDENCE)
        .map(|m| m.skill.as_str())
        .collect();

    if resume.skills.is_empty() && additions.is_empty() {
        return None;
    }

    let mut lines = vec![String::new(), "SKILLS".to_string()];
    for skill in &resume.skills {
        if is_enhanced(skill, matches) {
            lines.push(format!("• {skill}{EXPERT_SUFFIX}"));
        } else {
            lines.push(format!("• {skill}"));
        }
    }

    if !additions.is_empty() {
        lines.push(String::new());
        lines.push("Additional Relevant Skills:".to_string());
        lines.extend(
            additions
                .into_iter()
                .map(|skill| format!("• {skill}{WORKING_KNOWLEDGE_SUFFIX}")),
        );
    }

    Some(Section::new("SKILLS", lines))
}

/// The first skill match naming `skill` decides whether it is annotated.
fn is_enhanced(skill: &str, matches: &[SkillMatch]) -> bool {
    let skill_lower = skill.to_lowercase();
    matches
        .iter()
        .filter(|m| matches!(m.category, MatchCategory::Technical | MatchCategory::Soft))
        .find(|m| {
            let required = m.skill.to_lowercase();
            skill_lower == required || skill_lower.contains(&required)
        })
        .is_some_and(|m| m.action == MatchAction::Enhance)
}

fn experience_section(entries: &[ExperienceEntry], requirements: &JobRequirements) -> Section {
    let patterns: Vec<Regex> = requirements
        .skill_keywords()
        .filter(|skill| !skill.is_empty())
        .filter_map(|skill| Regex::new(&format!("(?i){}", regex::escape(skill))).ok())
        .collect();

    let mut lines = vec![String::new(), "EXPERIENCE".to_string()];
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let role = join_non_empty(&[&entry.title, &entry.company], " at ");
        lines.push(with_date(role, &entry.date));

        let mut description = entry.description.clone();
        for re in &patterns {
            let replacement = format!("${{0}}{RELEVANT_SKILL_SUFFIX}");
            description = re.replace_all(&description, replacement.as_str()).into_owned();
        }
        lines.extend(
            description
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string),
        );
    }

    Section::new("EXPERIENCE", lines)
}

fn education_section(entries: &[EducationEntry]) -> Section {
    let mut lines = vec![String::new(), "EDUCATION".to_string()];
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let degree = join_non_empty(&[&entry.degree, &entry.school], " - ");
        lines.push(with_date(degree, &entry.date));
        if !entry.gpa.trim().is_empty() {
            lines.push(format!("GPA: {}", entry.gpa.trim()));
        }
    }

    Section::new("EDUCATION", lines)
}

fn join_non_empty(parts: &[&String], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn with_date(line: String, date: &str) -> String {
    if date.trim().is_empty() {
        line
    } else {
        format!("{line} | {}", date.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tailoring::matcher::match_text;

    fn requirements(technical: &[&str], soft: &[&str]) -> JobRequirements {
        JobRequirements {
            technical_skills: technical.iter().map(|s| s.to_string()).collect(),
            soft_skills: soft.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn skill_match(skill: &str, action: MatchAction, confidence: f32, found: bool) -> SkillMatch {
        SkillMatch {
            skill: skill.to_string(),
            category: MatchCategory::Technical,
            action,
            confidence,
            found,
        }
    }

    #[test]
    fn test_skills_section_gets_expert_level_and_additional_block() {
        let resume = "Summary: Data engineer.\nSkills: Python\n\nExperience: Acme";
        let req = requirements(&["Python", "React"], &[]);
        let matches = match_text(resume, &req);

        assert_eq!(matches[0].action, MatchAction::Enhance);
        assert!(matches[0].found);
        assert_eq!(matches[1].action, MatchAction::Add);
        assert!(!matches[1].found);

        let output = generate_text(resume, &req, &matches);
        assert_eq!(
            output,
            "Summary: Data engineer.\nSkills: Python (Expert level)\n\nAdditional Skills:\n- React (Working knowledge)\n\nExperience: Acme"
        );
    }

    #[test]
    fn test_additional_block_appended_when_no_skills_section() {
        let resume = "Profile: Backend developer\nWorked with Go";
        let req = requirements(&["Python"], &[]);
        let matches = vec![skill_match("Python", MatchAction::Add, 0.6, false)];

        let output = generate_text(resume, &req, &matches);
        assert!(output.ends_with("Worked with Go\n\nAdditional Skills:\n- Python (Working knowledge)"));
    }

    #[test]
    fn test_only_first_matching_line_is_enhanced() {
        let resume = "Summary: x\nReact apps\nMore React";
        let req = requirements(&["React"], &[]);
        let matches = vec![skill_match("React", MatchAction::Enhance, 0.8, true)];

        let output = generate_text(resume, &req, &matches);
        assert_eq!(output, "Summary: x\nReact apps (Expert level)\nMore React");
    }

    #[test]
    fn test_enhance_requires_found() {
        let resume = "Summary: x\nReact apps";
        let matches = vec![skill_match("React", MatchAction::Enhance, 0.8, false)];
        let output = generate_text(resume, &JobRequirements::default(), &matches);
        assert!(!output.contains("Expert level"));
    }

    #[test]
    fn test_summary_prepended_when_missing() {
        let resume = "Jane Doe\nSkills: Python";
        let req = requirements(&["Python"], &["Communication"]);
        let output = generate_text(resume, &req, &[]);
        assert_eq!(
            output,
            "Professional Summary:\nExperienced professional with expertise in Python. Strong Communication skills with a proven track record of delivering high-quality results.\n\nJane Doe\nSkills: Python"
        );
    }

    #[test]
    fn test_objective_heading_suppresses_summary() {
        let resume = "Objective: land a role\nSkills: Python";
        let output = generate_text(resume, &JobRequirements::default(), &[]);
        assert_eq!(output, resume);
    }

    #[test]
    fn test_empty_requirements_still_prepend_summary() {
        let req = JobRequirements::default();
        let matches = match_text("Jane Doe", &req);
        assert!(matches.is_empty());

        let output = generate_text("Jane Doe", &req, &matches);
        assert!(output.starts_with("Professional Summary:\nExperienced professional with a strong technical background."));
        assert!(output.ends_with("\n\nJane Doe"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let resume = "Skills: Python\n- pandas\n\nExperience:\nAnalyst";
        let req = requirements(&["Python", "React", "Node.js"], &["Communication"]);
        let matches = match_text(resume, &req);
        assert_eq!(
            generate_text(resume, &req, &matches),
            generate_text(resume, &req, &matches)
        );
    }

    fn structured_fixture() -> StructuredResume {
        StructuredResume {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-123-4567".to_string(),
            location: String::new(),
            summary: "Ships reliable systems.".to_string(),
            skills: vec!["JavaScript (ES6)".to_string(), "SQL".to_string()],
            experience: vec![
                ExperienceEntry {
                    title: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    date: "2020 - Present".to_string(),
                    description: "Built react dashboards with the team.".to_string(),
                },
                ExperienceEntry {
                    title: "Intern".to_string(),
                    company: "Initech".to_string(),
                    date: "2019".to_string(),
                    description: "Wrote SQL reports.".to_string(),
                },
            ],
            education: vec![EducationEntry {
                degree: "BSc Computer Science".to_string(),
                school: "State University".to_string(),
                date: "2016 - 2020".to_string(),
                gpa: "3.8".to_string(),
            }],
        }
    }

    #[test]
    fn test_structured_output_layout() {
        let resume = structured_fixture();
        let req = requirements(&["JavaScript", "React"], &["Team Collaboration"]);
        let matches = vec![
            skill_match("JavaScript", MatchAction::Enhance, 0.9, true),
            skill_match("React", MatchAction::Add, 0.7, false),
            SkillMatch {
                skill: "Team Collaboration".to_string(),
                category: MatchCategory::Soft,
                action: MatchAction::Add,
                confidence: 0.6,
                found: false,
            },
        ];

        let output = generate_structured(&resume, "", &req, &matches);
        let expected = "Jane Doe\n\
jane@example.com | 555-123-4567\n\
\n\
PROFESSIONAL SUMMARY\n\
2+ years of experience professional with expertise in JavaScript, React. Strong Team Collaboration skills with a proven track record of delivering high-quality results. Ships reliable systems.\n\
\n\
SKILLS\n\
• JavaScript (ES6) (Expert level)\n\
• SQL\n\
\n\
Additional Relevant Skills:\n\
• React (Working knowledge)\n\
\n\
EXPERIENCE\n\
Engineer at Acme | 2020 - Present\n\
Built react (relevant skill) dashboards with the team.\n\
\n\
Intern at Initech | 2019\n\
Wrote SQL reports.\n\
\n\
EDUCATION\n\
BSc Computer Science - State University | 2016 - 2020\n\
GPA: 3.8";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_structured_without_experience_uses_plain_opening() {
        let resume = StructuredResume {
            name: String::new(),
            ..Default::default()
        };
        let output = generate_structured(&resume, "", &JobRequirements::default(), &[]);
        assert!(output.starts_with("Professional\n\nPROFESSIONAL SUMMARY\nExperienced professional with a strong technical background."));
        assert!(!output.contains("SKILLS"));
        assert!(!output.contains("EXPERIENCE"));
    }

    #[test]
    fn test_structured_summary_falls_back_to_original_text() {
        let resume = StructuredResume {
            name: "Jane".to_string(),
            ..Default::default()
        };
        let original = "Jane\nSummary: Data engineer\nfocused on pipelines\n\nSkills: SQL";
        let output = generate_structured(&resume, original, &JobRequirements::default(), &[]);
        assert!(output.contains("delivering high-quality results. Data engineer focused on pipelines."));
    }

    #[test]
    fn test_structured_summary_is_closed_as_a_sentence() {
        let resume = StructuredResume {
            summary: "Backend engineer with 5 years of experience in Go".to_string(),
            skills: vec!["Go".to_string()],
            ..Default::default()
        };
        let output = generate_structured(&resume, "", &JobRequirements::default(), &[]);
        assert!(output.contains("5 years of experience in Go.\n\nSKILLS"));
    }

    #[test]
    fn test_additional_skills_follow_lowercase_skill_labels() {
        let resume = "Summary: dev\nSkills:\nlanguages: go, python\ntools: docker\n\nExperience: Acme";
        let req = requirements(&["React"], &[]);
        let matches = match_text(resume, &req);
        assert_eq!(
            generate_text(resume, &req, &matches),
            "Summary: dev\nSkills:\nlanguages: go, python\ntools: docker\n\nAdditional Skills:\n- React (Working knowledge)\n\nExperience: Acme"
        );
    }

    #[test]
    fn test_structured_generation_is_deterministic() {
        let resume = structured_fixture();
        let req = requirements(&["JavaScript"], &[]);
        let matches = vec![skill_match("JavaScript", MatchAction::Enhance, 0.9, true)];
        assert_eq!(
            generate_structured(&resume, "", &req, &matches),
            generate_structured(&resume, "", &req, &matches)
        );
    }
}
