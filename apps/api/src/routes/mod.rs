pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::handlers as storage_handlers;
use crate::tailoring::handlers;

/// Upload cap for resume PDFs.
const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tailoring API
        .route(
            "/api/v1/requirements",
            post(handlers::handle_extract_requirements),
        )
        .route("/api/v1/resumes/parse", post(handlers::handle_parse_resume))
        .route(
            "/api/v1/resumes/parse-pdf",
            post(handlers::handle_parse_pdf).layer(DefaultBodyLimit::max(MAX_PDF_BYTES)),
        )
        .route("/api/v1/tailor", post(handlers::handle_tailor))
        // History & settings
        .route(
            "/api/v1/history",
            get(storage_handlers::handle_get_history).delete(storage_handlers::handle_clear_history),
        )
        .route(
            "/api/v1/settings",
            get(storage_handlers::handle_get_settings).put(storage_handlers::handle_update_settings),
        )
        .fallback(handle_not_found)
        .with_state(state)
}

/// Unknown paths get the same JSON error body as every other failure.
async fn handle_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStore;
    use crate::tailoring::classifier::PatternClassifier;

    fn app() -> Router {
        build_router(AppState::new(
            Config::default(),
            Arc::new(PatternClassifier),
            Arc::new(MemoryStore::default()),
        ))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "resume-tailor");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let (status, body) = send(&app(), "GET", "/api/v1/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "No route for /api/v1/unknown");
    }

    #[tokio::test]
    async fn test_extract_requirements_endpoint() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/v1/requirements",
            Some(json!({
                "jobDescription": "We need 3+ years experience with Python and React, bachelor's required."
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "pattern");
        assert_eq!(body["requirements"]["technicalSkills"], json!(["React", "Python"]));
        assert_eq!(body["requirements"]["experience"], json!(["3+ years of experience"]));
        assert_eq!(body["requirements"]["education"], json!(["Bachelor's Degree"]));
    }

    #[tokio::test]
    async fn test_empty_job_description_is_bad_request() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/v1/requirements",
            Some(json!({"jobDescription": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_parse_resume_endpoint() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/v1/resumes/parse",
            Some(json!({"resumeText": "Jane Doe\njane@example.com\nSkills: React, CSS"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["structuredData"]["name"], "Jane Doe");
        assert_eq!(body["structuredData"]["skills"], json!(["React", "CSS"]));
    }

    #[tokio::test]
    async fn test_tailor_success_is_recorded_in_history() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/tailor",
            Some(json!({
                "resume": "Summary: Backend developer.\nSkills: Python\n\nExperience:\nBuilt APIs",
                "jobDescription": "Python and React developer"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["stats"]["skillMatches"], 2);
        assert!(body["tailoredResume"]
            .as_str()
            .unwrap()
            .contains("Python (Expert level)"));

        let (status, history) = send(&app, "GET", "/api/v1/history", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["jobDescription"], "Python and React developer");

        let (status, _) = send(&app, "DELETE", "/api/v1/history", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, history) = send(&app, "GET", "/api/v1/history", None).await;
        assert_eq!(history, json!([]));
    }

    #[tokio::test]
    async fn test_tailor_quality_rejection_is_reported_in_body() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/tailor",
            Some(json!({
                "resume": "Summary: Python Python Python Python Python developer.",
                "jobDescription": "Python role"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains(r#"Excessive use of keyword "Python" (5 times)"#));
        assert!(body.get("tailoredResume").is_none());

        let (_, history) = send(&app, "GET", "/api/v1/history", None).await;
        assert_eq!(history, json!([]));
    }

    #[tokio::test]
    async fn test_settings_round_trip_and_history_opt_out() {
        let app = app();
        let (status, settings) = send(&app, "GET", "/api/v1/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(settings, json!({"autoExtract": true, "saveHistory": true}));

        let (status, settings) = send(
            &app,
            "PUT",
            "/api/v1/settings",
            Some(json!({"saveHistory": false})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(settings, json!({"autoExtract": true, "saveHistory": false}));

        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/tailor",
            Some(json!({
                "resume": "Skills: Python",
                "jobDescription": "Python developer"
            })),
        )
        .await;
        assert_eq!(body["success"], true);

        let (_, history) = send(&app, "GET", "/api/v1/history", None).await;
        assert_eq!(history, json!([]));
    }

    #[tokio::test]
    async fn test_parse_pdf_without_file_is_bad_request() {
        let boundary = "X-BOUNDARY";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/parse-pdf")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
