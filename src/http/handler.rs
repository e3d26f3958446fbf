//! HTTP handlers for the question-answering API

use axum::{
    extract::{Json, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::server::Assets;
use crate::catalog::EXAMPLE_QUESTIONS;
use crate::error::PipelineError;
use crate::rag::PipelineService;

/// Body of `POST /api/query`
#[derive(Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub question: Option<String>,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

fn status_of(err: &PipelineError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn error_response(err: &PipelineError) -> Response {
    let body = match err {
        PipelineError::NotReady { initialization_error } => json!({
            "error": err.to_string(),
            "initialization_error": initialization_error,
        }),
        _ => json!({
            "error": err.to_string(),
            "timestamp": timestamp(),
        }),
    };
    (status_of(err), Json(body)).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Endpoint not found" }))).into_response()
}

pub async fn health_handler(State(service): State<Arc<PipelineService>>) -> impl IntoResponse {
    Json(service.health().await)
}

pub async fn stats_handler(State(service): State<Arc<PipelineService>>) -> Response {
    match service.stats().await {
        Ok(stats) => Json(json!({
            "total_nodes": stats.total_nodes,
            "total_characters": stats.total_characters,
            "total_movies": stats.total_movies,
            "total_relationships": stats.total_relationships,
            "timestamp": timestamp(),
        }))
        .into_response(),
        Err(err) => {
            error!(kind = err.kind(), "Failed to load graph statistics: {}", err);
            error_response(&err)
        }
    }
}

/// Handler for natural-language questions
pub async fn query_handler(
    State(service): State<Arc<PipelineService>>,
    payload: Option<Json<QueryRequest>>,
) -> Response {
    let span = info_span!("query", request_id = %Uuid::new_v4());
    async move {
        // One snapshot for the whole request
        let snapshot = service.snapshot().await;
        let pipeline = match snapshot.pipeline() {
            Ok(pipeline) => pipeline,
            Err(err) => return error_response(&err),
        };

        let question = payload
            .and_then(|Json(request)| request.question)
            .map(|q| q.trim().to_string())
            .unwrap_or_default();
        if question.is_empty() {
            return error_response(&PipelineError::InvalidQuestion("Question not provided".to_string()));
        }

        info!("Question: {}", question);
        match pipeline.ask(&question).await {
            Ok(response) => {
                let processing_time = (response.elapsed.as_secs_f64() * 100.0).round() / 100.0;
                info!(
                    processing_time,
                    rows = response.execution.row_count,
                    "Answered question"
                );
                Json(json!({
                    "answer": response.answer,
                    "cypher_query": response.generated_query,
                    "processing_time": processing_time,
                    "timestamp": timestamp(),
                    "question": question,
                    "execution": response.execution,
                }))
                .into_response()
            }
            Err(err) => {
                error!(kind = err.kind(), "Error processing question: {:?}", err);
                error_response(&err)
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn examples_handler() -> impl IntoResponse {
    Json(EXAMPLE_QUESTIONS)
}

/// Re-run initialization (useful after fixing the environment)
pub async fn reset_handler(State(service): State<Arc<PipelineService>>) -> impl IntoResponse {
    let result = service.initialize().await;
    let success = result.is_ok();
    Json(json!({
        "success": success,
        "message": if success { "System reinitialized successfully!" } else { "Reinitialization failed" },
        "error": result.err().map(|e| e.to_string()),
        "timestamp": timestamp(),
    }))
}

pub async fn index_handler() -> Response {
    match Assets::get("index.html") {
        Some(file) => Html(file.data.into_owned()).into_response(),
        None => not_found(),
    }
}

/// Embedded frontend assets, JSON 404 for anything else
pub async fn fallback_handler(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    if path.starts_with("api/") {
        return not_found();
    }
    match Assets::get(path) {
        Some(file) => (
            [(header::CONTENT_TYPE, content_type(path).to_string())],
            file.data.into_owned(),
        )
            .into_response(),
        None => not_found(),
    }
}

fn content_type(path: &str) -> mime::Mime {
    match path.rsplit('.').next() {
        Some("html") => mime::TEXT_HTML_UTF_8,
        Some("js") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        Some("css") => mime::TEXT_CSS_UTF_8,
        Some("json") => mime::APPLICATION_JSON,
        Some("svg") => mime::IMAGE_SVG,
        Some("png") => mime::IMAGE_PNG,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
