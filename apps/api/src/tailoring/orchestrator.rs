//! Tailoring pipeline: validate → extract → match → generate → evaluate.
//!
//! Only the extraction step goes through the classifier seam; every later
//! stage is a pure function of its inputs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::StructuredResume;
use crate::tailoring::classifier::TextClassifier;
use crate::tailoring::generator::{generate_structured, generate_text};
use crate::tailoring::matcher::{match_skills, MatchAction, ResumeInput, SkillMatch};
use crate::tailoring::quality::evaluate_quality;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TailorRequest {
    /// Raw resume text. May be empty when `structured_resume` is supplied.
    pub resume: String,
    pub job_description: String,
    #[serde(alias = "structuredData")]
    pub structured_resume: Option<StructuredResume>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoringStats {
    pub skill_matches: usize,
    pub added_skills: usize,
    pub enhanced_skills: usize,
}

impl TailoringStats {
    fn from_matches(matches: &[SkillMatch]) -> Self {
        let count = |action: MatchAction| matches.iter().filter(|m| m.action == action).count();
        Self {
            skill_matches: matches.len(),
            added_skills: count(MatchAction::Add),
            enhanced_skills: count(MatchAction::Enhance),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TailoredResume {
    pub text: String,
    pub stats: TailoringStats,
}

/// Wire shape returned to callers of the tailor endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoringResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tailored_resume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TailoringStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<TailoredResume, AppError>> for TailoringResult {
    fn from(result: Result<TailoredResume, AppError>) -> Self {
        match result {
            Ok(tailored) => Self {
                success: true,
                tailored_resume: Some(tailored.text),
                stats: Some(tailored.stats),
                error: None,
            },
            Err(e) => Self {
                success: false,
                tailored_resume: None,
                stats: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Clone)]
pub struct Tailor {
    classifier: Arc<dyn TextClassifier>,
}

impl Tailor {
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self { classifier }
    }

    /// Runs the full pipeline. A failing quality verdict discards the generated
    /// text and returns `AppError::QualityRejected` with the joined issues.
    pub async fn tailor(&self, request: &TailorRequest) -> Result<TailoredResume, AppError> {
        validate(request)?;

        info!(
            "Extracting job requirements ({} backend)",
            self.classifier.backend()
        );
        let requirements = self
            .classifier
            .extract_requirements(&request.job_description)
            .await?;
        if requirements.is_empty() {
            info!("No requirements detected in job description");
        }

        info!("Matching resume skills with job requirements");
        let resume_input = match &request.structured_resume {
            Some(structured) => ResumeInput::Structured(structured),
            None => ResumeInput::Text(&request.resume),
        };
        let matches = match_skills(resume_input, &requirements);

        info!("Generating tailored content");
        let text = match &request.structured_resume {
            Some(structured) => {
                generate_structured(structured, &request.resume, &requirements, &matches)
            }
            None => generate_text(&request.resume, &requirements, &matches),
        };

        info!("Evaluating quality");
        let verdict = evaluate_quality(&quality_baseline(request), &text, &requirements);
        if !verdict.passes {
            info!("Quality check rejected tailored resume (score {:.1})", verdict.score);
            return Err(AppError::QualityRejected(verdict.reason()));
        }

        Ok(TailoredResume {
            text,
            stats: TailoringStats::from_matches(&matches),
        })
    }
}

/// What the candidate supplied: claims found here are never flagged as fabricated.
fn quality_baseline(request: &TailorRequest) -> String {
    match &request.structured_resume {
        Some(structured) => format!("{}\n{}", request.resume, structured.to_plain_text()),
        None => request.resume.clone(),
    }
}

fn validate(request: &TailorRequest) -> Result<(), AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description cannot be empty".to_string(),
        ));
    }
    if request.resume.trim().is_empty() && request.structured_resume.is_none() {
        return Err(AppError::Validation("resume cannot be empty".to_string()));
    }
    Ok(())
}
