// Prompts for the LLM-backed classifier. Schemas mirror the serde shapes of
// `JobRequirements` and `StructuredResume` so replies deserialize directly.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};

const REQUIREMENTS_ROLE: &str = "You are an expert job description analyst. \
    Extract the requirements a candidate must meet from a job description.";

const REQUIREMENTS_PROMPT_TEMPLATE: &str = r#"Extract the requirements from the following job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "technicalSkills": ["Python", "React"],
  "softSkills": ["Communication"],
  "experience": ["3+ years of experience"],
  "education": ["Bachelor's Degree"]
}

Rules:
- List each skill once, in the order it first appears.
- Experience entries use the form "N+ years of experience".
- Education entries are degree levels such as "Bachelor's Degree" or "Master's Degree".

{no_invention}

Job description:
{job_description}"#;

const RESUME_ROLE: &str = "You are an expert resume parser. \
    Convert resume text into structured fields.";

const RESUME_PROMPT_TEMPLATE: &str = r#"Parse the following resume into structured fields.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "",
  "email": "",
  "phone": "",
  "location": "",
  "summary": "",
  "skills": ["Python"],
  "experience": [
    {"title": "", "company": "", "date": "", "description": ""}
  ],
  "education": [
    {"degree": "", "school": "", "date": "", "gpa": ""}
  ]
}

{no_invention}

Resume:
{resume_text}"#;

pub fn requirements_system() -> String {
    format!("{REQUIREMENTS_ROLE} {JSON_ONLY_SYSTEM}")
}

pub fn requirements_prompt(job_description: &str) -> String {
    REQUIREMENTS_PROMPT_TEMPLATE
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
        .replace("{job_description}", job_description)
}

pub fn resume_system() -> String {
    format!("{RESUME_ROLE} {JSON_ONLY_SYSTEM}")
}

pub fn resume_prompt(resume_text: &str) -> String {
    RESUME_PROMPT_TEMPLATE
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION)
        .replace("{resume_text}", resume_text)
}
