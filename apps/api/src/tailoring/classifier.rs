//! Text classification seam: the pluggable capability that turns raw job and
//! resume text into structured data.
//!
//! Default: `PatternClassifier` (rule table, deterministic, no I/O).
//! `LlmClassifier` asks Claude instead; `FallbackClassifier` wraps any primary
//! and drops back to the pattern rules when it is unreachable.
//!
//! `AppState` holds an `Arc<dyn TextClassifier>`, chosen at startup via config.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::StructuredResume;
use crate::tailoring::prompts;
use crate::tailoring::requirements::{extract_requirements, JobRequirements};
use crate::tailoring::resume_parser::parse_resume_text;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn extract_requirements(&self, job_description: &str)
        -> Result<JobRequirements, AppError>;

    async fn parse_resume(&self, resume_text: &str) -> Result<StructuredResume, AppError>;

    /// Short backend name for logs and responses, e.g. "pattern".
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// PatternClassifier (default)
// ────────────────────────────────────────────────────────────────────────────

pub struct PatternClassifier;

#[async_trait]
impl TextClassifier for PatternClassifier {
    async fn extract_requirements(
        &self,
        job_description: &str,
    ) -> Result<JobRequirements, AppError> {
        Ok(extract_requirements(job_description))
    }

    async fn parse_resume(&self, resume_text: &str) -> Result<StructuredResume, AppError> {
        Ok(parse_resume_text(resume_text))
    }

    fn backend(&self) -> &'static str {
        "pattern"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmClassifier
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmClassifier(pub LlmClient);

/// Any client failure means the backend is unavailable to the caller.
fn upstream(context: &str, err: LlmError) -> AppError {
    AppError::Upstream(format!("{context}: {err}"))
}

#[async_trait]
impl TextClassifier for LlmClassifier {
    async fn extract_requirements(
        &self,
        job_description: &str,
    ) -> Result<JobRequirements, AppError> {
        let requirements: JobRequirements = self
            .0
            .call_json(
                &prompts::requirements_prompt(job_description),
                &prompts::requirements_system(),
            )
            .await
            .map_err(|e| upstream("Requirement extraction failed", e))?;
        debug!("LLM extracted requirements: {requirements:?}");
        Ok(requirements)
    }

    async fn parse_resume(&self, resume_text: &str) -> Result<StructuredResume, AppError> {
        self.0
            .call_json(
                &prompts::resume_prompt(resume_text),
                &prompts::resume_system(),
            )
            .await
            .map_err(|e| upstream("Resume parsing failed", e))
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FallbackClassifier
// ────────────────────────────────────────────────────────────────────────────

/// Tries `primary` first; on `AppError::Upstream` answers with the pattern rules.
/// Every other error is returned unchanged.
pub struct FallbackClassifier {
    primary: Arc<dyn TextClassifier>,
    fallback: PatternClassifier,
}

impl FallbackClassifier {
    pub fn new(primary: Arc<dyn TextClassifier>) -> Self {
        Self {
            primary,
            fallback: PatternClassifier,
        }
    }
}

#[async_trait]
impl TextClassifier for FallbackClassifier {
    async fn extract_requirements(
        &self,
        job_description: &str,
    ) -> Result<JobRequirements, AppError> {
        match self.primary.extract_requirements(job_description).await {
            Err(AppError::Upstream(reason)) => {
                warn!(
                    "{} classifier unavailable ({reason}); using pattern rules",
                    self.primary.backend()
                );
                self.fallback.extract_requirements(job_description).await
            }
            other => other,
        }
    }

    async fn parse_resume(&self, resume_text: &str) -> Result<StructuredResume, AppError> {
        match self.primary.parse_resume(resume_text).await {
            Err(AppError::Upstream(reason)) => {
                warn!(
                    "{} classifier unavailable ({reason}); using pattern rules",
                    self.primary.backend()
                );
                self.fallback.parse_resume(resume_text).await
            }
            other => other,
        }
    }

    fn backend(&self) -> &'static str {
        self.primary.backend()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Primary that always fails with the given error kind.
    pub(crate) struct FailingClassifier {
        pub upstream: bool,
    }

    #[async_trait]
    impl TextClassifier for FailingClassifier {
        async fn extract_requirements(&self, _: &str) -> Result<JobRequirements, AppError> {
            Err(self.error())
        }

        async fn parse_resume(&self, _: &str) -> Result<StructuredResume, AppError> {
            Err(self.error())
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    impl FailingClassifier {
        fn error(&self) -> AppError {
            if self.upstream {
                AppError::Upstream("connection refused".to_string())
            } else {
                AppError::Validation("bad input".to_string())
            }
        }
    }

    const JOB: &str = "We need 3+ years experience with Python and React, bachelor's required.";

    #[tokio::test]
    async fn test_pattern_classifier_extracts_requirements() {
        let requirements = PatternClassifier.extract_requirements(JOB).await.unwrap();
        assert_eq!(requirements.technical_skills, vec!["React", "Python"]);
        assert_eq!(PatternClassifier.backend(), "pattern");
    }

    #[tokio::test]
    async fn test_pattern_classifier_parses_resume() {
        let resume = PatternClassifier
            .parse_resume("Jane Doe\njane@example.com\nSkills: Python, SQL")
            .await
            .unwrap();
        assert_eq!(resume.name, "Jane Doe");
        assert_eq!(resume.skills, vec!["Python", "SQL"]);
    }

    #[tokio::test]
    async fn test_fallback_uses_pattern_rules_on_upstream_error() {
        let classifier = FallbackClassifier::new(Arc::new(FailingClassifier { upstream: true }));
        let requirements = classifier.extract_requirements(JOB).await.unwrap();
        assert_eq!(requirements, extract_requirements(JOB));

        let resume = classifier.parse_resume("Skills: AWS").await.unwrap();
        assert_eq!(resume.skills, vec!["AWS"]);
    }

    #[tokio::test]
    async fn test_fallback_propagates_other_errors() {
        let classifier = FallbackClassifier::new(Arc::new(FailingClassifier { upstream: false }));
        let err = classifier.extract_requirements(JOB).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_fallback_reports_primary_backend() {
        let classifier = FallbackClassifier::new(Arc::new(PatternClassifier));
        assert_eq!(classifier.backend(), "pattern");
    }

    #[test]
    fn test_llm_errors_map_to_upstream() {
        let err = upstream("Requirement extraction failed", LlmError::EmptyContent);
        match err {
            AppError::Upstream(msg) => {
                assert_eq!(msg, "Requirement extraction failed: LLM returned empty content")
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
