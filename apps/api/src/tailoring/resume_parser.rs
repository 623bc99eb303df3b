//! Heuristic resume parser backing `PatternClassifier::parse_resume`.
//!
//! Only fields that actually appear in the text are filled in; anything the
//! rules cannot find stays empty rather than being guessed.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::models::resume::{EducationEntry, ExperienceEntry, StructuredResume};
use crate::tailoring::document::{ResumeDocument, Section};
use crate::tailoring::text::contains_ignore_case;

const SKILL_CATALOG: &[&str] = &[
    "JavaScript",
    "Python",
    "React",
    "Node.js",
    "HTML",
    "CSS",
    "SQL",
    "AWS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Summary,
    Experience,
    Education,
    Other,
}

impl SectionKind {
    fn of(heading: &str) -> Self {
        let heading = heading.to_lowercase();
        if ["summary", "profile", "objective"]
            .iter()
            .any(|h| heading.ends_with(h))
        {
            SectionKind::Summary
        } else if heading.ends_with("experience") {
            SectionKind::Experience
        } else if heading.ends_with("education") {
            SectionKind::Education
        } else {
            SectionKind::Other
        }
    }
}

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Z][a-z]+(?: [A-Z][a-z]+)+$").expect("name pattern is a valid regex")
    })
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("email pattern is a valid regex"))
}

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("phone pattern is a valid regex")
    })
}

/// `Title at Company | Date`, date optional.
fn role_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+?)\s+at\s+(.+?)(?:\s*\|\s*(.+))?$").expect("role pattern is a valid regex")
    })
}

/// `Degree - School | Date`, date optional.
fn degree_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+?)\s+-\s+(.+?)(?:\s*\|\s*(.+))?$")
            .expect("degree pattern is a valid regex")
    })
}

fn gpa_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^gpa:\s*(.+)$").expect("gpa pattern is a valid regex"))
}

fn capture(caps: &regex::Captures<'_>, i: usize) -> String {
    caps.get(i)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['-', '•', '*'])
        .trim_start()
}

/// Text after the heading's colon on the heading line, then the body lines.
fn section_body(section: &Section) -> (Option<&str>, &[String]) {
    match (&section.heading, section.lines.split_first()) {
        (Some(_), Some((first, rest))) => {
            let inline = first.split_once(':').map(|(_, after)| after.trim());
            (inline.filter(|s| !s.is_empty()), rest)
        }
        _ => (None, section.lines.as_slice()),
    }
}

/// Extracts a `StructuredResume` from plain resume text.
pub fn parse_resume_text(text: &str) -> StructuredResume {
    let doc = ResumeDocument::parse(text);

    let mut resume = StructuredResume {
        name: text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .filter(|line| name_pattern().is_match(line))
            .unwrap_or_default()
            .to_string(),
        email: email_pattern()
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        phone: phone_pattern()
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        skills: SKILL_CATALOG
            .iter()
            .filter(|skill| contains_ignore_case(text, skill))
            .map(|skill| skill.to_string())
            .collect(),
        ..Default::default()
    };

    let mut summary_parts: Vec<&str> = Vec::new();
    let mut kind = SectionKind::Other;

    for section in doc.sections() {
        let (inline, body) = section_body(section);

        match section.heading.as_deref() {
            // "GPA: 3.8" parses as a heading but belongs to the current education entry.
            Some(heading) if heading.eq_ignore_ascii_case("gpa") && kind == SectionKind::Education => {
                if let (Some(gpa), Some(entry)) = (inline, resume.education.last_mut()) {
                    entry.gpa = gpa.to_string();
                }
            }
            Some(heading) => {
                kind = SectionKind::of(heading);
                if kind == SectionKind::Summary {
                    summary_parts.extend(inline);
                }
            }
            None => kind = SectionKind::Other,
        }

        for line in body.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            match kind {
                SectionKind::Summary => summary_parts.push(line),
                SectionKind::Experience => push_experience_line(&mut resume.experience, line),
                SectionKind::Education => push_education_line(&mut resume.education, line),
                SectionKind::Other => {}
            }
        }
    }

    resume.summary = summary_parts.join(" ");

    debug!(
        "Parsed resume: {} skills, {} roles, {} degrees",
        resume.skills.len(),
        resume.experience.len(),
        resume.education.len()
    );

    resume
}

fn push_experience_line(entries: &mut Vec<ExperienceEntry>, line: &str) {
    if let Some(caps) = role_line().captures(line) {
        entries.push(ExperienceEntry {
            title: capture(&caps, 1),
            company: capture(&caps, 2),
            date: capture(&caps, 3),
            description: String::new(),
        });
        return;
    }

    // Lines before the first role line have nothing to attach to.
    if let Some(entry) = entries.last_mut() {
        let line = strip_bullet(line);
        if !entry.description.is_empty() {
            entry.description.push(' ');
        }
        entry.description.push_str(line);
    }
}

fn push_education_line(entries: &mut Vec<EducationEntry>, line: &str) {
    if let Some(caps) = gpa_line().captures(line) {
        if let Some(entry) = entries.last_mut() {
            entry.gpa = capture(&caps, 1);
        }
    } else if let Some(caps) = degree_line().captures(line) {
        entries.push(EducationEntry {
            degree: capture(&caps, 1),
            school: capture(&caps, 2),
            date: capture(&caps, 3),
            gpa: String::new(),
        });
    }
}
