//! Axum route handlers for the Tailoring API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::StructuredResume;
use crate::state::AppState;
use crate::storage::history::HistoryEntry;
use crate::tailoring::orchestrator::{TailorRequest, TailoringResult};
use crate::tailoring::requirements::JobRequirements;

/// Extracted PDF text shorter than this is treated as a failed extraction.
const MIN_PDF_TEXT_CHARS: usize = 50;
const PDF_FALLBACK_NOTICE: &str = "PDF text extraction was limited. \
    For better results, please copy and paste the resume text manually.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequirementsRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequirementsResponse {
    pub requirements: JobRequirements,
    pub backend: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResumeResponse {
    pub structured_data: StructuredResume,
    pub backend: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsePdfResponse {
    /// Extracted text, or a notice asking for manual paste when extraction was poor.
    pub text: String,
    pub structured_data: Option<StructuredResume>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/requirements
pub async fn handle_extract_requirements(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequirementsRequest>,
) -> Result<Json<ExtractRequirementsResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription cannot be empty".to_string(),
        ));
    }

    let requirements = state
        .classifier
        .extract_requirements(&request.job_description)
        .await?;

    Ok(Json(ExtractRequirementsResponse {
        requirements,
        backend: state.classifier.backend(),
    }))
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ParseResumeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resumeText cannot be empty".to_string()));
    }

    let structured_data = state.classifier.parse_resume(&request.resume_text).await?;

    Ok(Json(ParseResumeResponse {
        structured_data,
        backend: state.classifier.backend(),
    }))
}

/// POST /api/v1/resumes/parse-pdf
///
/// Multipart upload with the PDF in a `file` field. Text extraction runs on the
/// blocking pool; image-only PDFs yield a notice and no structured data.
pub async fn handle_parse_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsePdfResponse>, AppError> {
    let mut pdf_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            pdf_bytes = Some(bytes);
            break;
        }
    }
    let pdf_bytes =
        pdf_bytes.ok_or_else(|| AppError::Validation("No PDF file provided".to_string()))?;

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf_bytes))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Validation(format!("Failed to parse PDF: {e}")))?;
    let text = text.trim();

    if text.chars().count() < MIN_PDF_TEXT_CHARS {
        warn!("Extracted PDF text is very short; the PDF may be image-based");
        return Ok(Json(ParsePdfResponse {
            text: PDF_FALLBACK_NOTICE.to_string(),
            structured_data: None,
        }));
    }

    let structured_data = state.classifier.parse_resume(text).await?;

    Ok(Json(ParsePdfResponse {
        text: text.to_string(),
        structured_data: Some(structured_data),
    }))
}

/// POST /api/v1/tailor
///
/// A quality rejection is an expected outcome and comes back as
/// `{ "success": false, "error": ... }` with 200. Successful runs are recorded
/// in history unless the `saveHistory` setting is off.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailoringResult>, AppError> {
    let tailored = match state.tailor.tailor(&request).await {
        Ok(tailored) => tailored,
        Err(e @ AppError::QualityRejected(_)) => {
            return Ok(Json(TailoringResult::from(Err(e))));
        }
        Err(e) => return Err(e),
    };

    let entry = HistoryEntry::new(&request.job_description, &tailored);
    match state.history.save(entry).await {
        Ok(true) => info!("Tailoring run saved to history"),
        Ok(false) => {}
        // The tailored resume is still returned when history cannot be written.
        Err(e) => warn!("Failed to save tailoring history: {e}"),
    }

    Ok(Json(TailoringResult::from(Ok(tailored))))
}
