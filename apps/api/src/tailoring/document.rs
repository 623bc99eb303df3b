//! Lightweight resume document model: an ordered list of named sections, each an
//! ordered list of raw lines.
//!
//! Parsing never rewrites content, so `ResumeDocument::parse(text).render() == text`.
//! The generator edits lines in place instead of splicing the raw string, which
//! keeps insertion points explicit.

use std::sync::OnceLock;

use regex::Regex;

use crate::tailoring::text::contains_ignore_case;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading name without the trailing colon; `None` for text before the first heading.
    pub heading: Option<String>,
    /// Raw lines, including the heading line itself when there is one.
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(heading: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            lines,
        }
    }

    fn heading_lower(&self) -> Option<String> {
        self.heading.as_deref().map(str::to_lowercase)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeDocument {
    sections: Vec<Section>,
}

/// A heading is one to four words at the start of a line followed by a colon,
/// e.g. "Skills:", "Professional Summary: ...".
fn heading_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z][A-Za-z&/'-]*(?: [A-Za-z&/'-]+){0,3})\s*:(?:$|[^/])")
            .expect("heading pattern is a valid regex")
    })
}

fn heading_of(line: &str) -> Option<String> {
    heading_pattern()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn starts_uppercase(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_uppercase)
}

impl ResumeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `text` into sections at heading lines.
    pub fn parse(text: &str) -> Self {
        let mut sections = vec![Section {
            heading: None,
            lines: Vec::new(),
        }];

        for line in text.split('\n') {
            if let Some(heading) = heading_of(line) {
                sections.push(Section::new(heading, vec![line.to_string()]));
            } else if let Some(current) = sections.last_mut() {
                current.lines.push(line.to_string());
            }
        }

        // Drop the empty preamble when the text opens with a heading.
        if sections.len() > 1 && sections[0].lines.is_empty() {
            sections.remove(0);
        }

        Self { sections }
    }

    pub fn render(&self) -> String {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn prepend_section(&mut self, section: Section) {
        self.sections.insert(0, section);
    }

    /// True if any section heading ends with one of `names` (case-insensitive),
    /// so "Career Objective" counts as an objective heading.
    pub fn has_heading_ending_with(&self, names: &[&str]) -> bool {
        self.sections.iter().any(|section| {
            section
                .heading_lower()
                .is_some_and(|h| names.iter().any(|name| h.ends_with(name)))
        })
    }

    /// Index of the first section whose heading equals `name` (case-insensitive).
    pub fn find_section(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.sections
            .iter()
            .position(|s| s.heading_lower().as_deref() == Some(name.as_str()))
    }

    /// Appends `suffix` to the first line containing `needle`. Returns whether a line was found.
    pub fn append_to_first_line_containing(&mut self, needle: &str, suffix: &str) -> bool {
        let line = self
            .sections
            .iter_mut()
            .flat_map(|s| s.lines.iter_mut())
            .find(|line| contains_ignore_case(line, needle));

        match line {
            Some(line) => {
                line.push_str(suffix);
                true
            }
            None => false,
        }
    }

    /// Inserts `block` right after the content of section `index`: the lines after
    /// its heading up to the first blank line, the first line opening with an
    /// uppercase letter, or the end of the document. Content runs on into following
    /// sections whose heading lines start lowercase ("tools: docker").
    pub fn insert_after_section_content(&mut self, index: usize, block: Vec<String>) {
        let Some(section) = self.sections.get(index) else {
            return;
        };

        let mut end = (index, 1.min(section.lines.len()));
        let mut cursor = end;
        while let Some(section) = self.sections.get(cursor.0) {
            let Some(line) = section.lines.get(cursor.1) else {
                cursor = (cursor.0 + 1, 0);
                continue;
            };
            if is_blank(line) || starts_uppercase(line) {
                break;
            }
            cursor.1 += 1;
            end = cursor;
        }

        let (target, at) = end;
        let needs_separator = !self.line_after_is_blank_or_end(target, at);
        let mut insertion: Vec<String> = Vec::with_capacity(block.len() + 2);
        insertion.push(String::new());
        insertion.extend(block);
        if needs_separator {
            insertion.push(String::new());
        }
        self.sections[target].lines.splice(at..at, insertion);
    }

    /// Appends `block` as a new trailing section, separated by one blank line.
    pub fn append_block(&mut self, heading: &str, block: Vec<String>) {
        let ends_blank = self
            .sections
            .iter()
            .rev()
            .flat_map(|s| s.lines.iter().rev())
            .next()
            .map_or(true, |line| is_blank(line));

        let mut lines = Vec::with_capacity(block.len() + 1);
        if !ends_blank {
            lines.push(String::new());
        }
        lines.extend(block);
        self.sections.push(Section::new(heading, lines));
    }

    fn line_after_is_blank_or_end(&self, index: usize, at: usize) -> bool {
        let next = self.sections[index]
            .lines
            .get(at)
            .or_else(|| {
                self.sections[index + 1..]
                    .iter()
                    .flat_map(|s| s.lines.iter())
                    .next()
            });
        next.map_or(true, |line| is_blank(line))
    }
}
