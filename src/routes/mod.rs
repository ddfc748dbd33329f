//! Router assembly: HTTP endpoints, body limit, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - quiz generation under `/api/quiz/generate` (JSON text or multipart PDF)
/// - raw generation passthrough under `/api/ollama/generate`
/// - quiz/document records and dashboard stats under `/api/quizzes`, `/api/documents`, `/api/progress`
/// - request body limit from settings (uploads included)
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.settings.body_limit;

    Router::new()
        .route("/", get(http::http_root))
        .route("/api/health", get(http::http_health))
        // Generation
        .route("/api/quiz/generate", post(http::http_generate_quiz))
        .route("/api/ollama/generate", post(http::http_ollama_generate))
        // Records
        .route("/api/quizzes", get(http::http_list_quizzes).post(http::http_create_quiz))
        .route("/api/quizzes/:id", get(http::http_get_quiz))
        .route("/api/quizzes/:id/submit", post(http::http_submit_quiz))
        .route("/api/documents", get(http::http_list_documents))
        .route("/api/progress", get(http::http_progress))
        // State + limits + CORS + HTTP tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
