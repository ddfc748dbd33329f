//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  body::Bytes,
  extract::{rejection::JsonRejection, FromRequest, Multipart, Path, Request, State},
  http::{header::CONTENT_TYPE, StatusCode},
  response::IntoResponse,
  Json,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::logic::{self, QuizSource, TEXT_REQUIRED};
use crate::progress;
use crate::protocol::*;
use crate::state::{AppState, DOCUMENT_LIST_LIMIT, QUIZ_LIST_LIMIT};

pub const PDF_REQUIRED: &str = "PDF file is required.";
pub const PDF_EMPTY: &str = "The PDF file contains no extractable text.";
const PDF_FIELD: &str = "pdfFile";

#[instrument(level = "info")]
pub async fn http_root() -> impl IntoResponse { "Hello from the backend!" }

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { (StatusCode::OK, "OK") }

#[instrument(level = "info", skip(state, req))]
pub async fn http_generate_quiz(
  State(state): State<Arc<AppState>>,
  req: Request,
) -> Result<impl IntoResponse, AppError> {
  let source = read_source(&state, req).await?;
  let count = source.question_count(state.quiz_config.default_question_count);
  let questions = logic::generate_questions(&state, &source.text, count).await?;
  info!(target: "quiz", count = questions.len(), "HTTP quiz generated");
  Ok(Json(questions))
}

#[instrument(level = "info", skip(state, req))]
pub async fn http_ollama_generate(
  State(state): State<Arc<AppState>>,
  req: Request,
) -> Result<impl IntoResponse, AppError> {
  let body: PromptIn = read_json_or_default(&state, req).await?;
  let response = logic::passthrough(&state, body.prompt).await?;
  Ok(Json(PromptOut { response }))
}

#[instrument(level = "info", skip(state, req))]
pub async fn http_create_quiz(
  State(state): State<Arc<AppState>>,
  req: Request,
) -> Result<impl IntoResponse, AppError> {
  let source = read_source(&state, req).await?;
  let quiz = logic::create_quiz(&state, source).await?;
  Ok((StatusCode::CREATED, Json(quiz)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_quizzes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.list_quizzes(QUIZ_LIST_LIMIT).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
  state
    .get_quiz(&id)
    .await
    .map(Json)
    .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found.", id)))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_submit_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  body: Result<Json<SubmitQuizIn>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
  let Json(body) = body?;
  let report = state.complete_quiz(&id, &body.answers, body.time_spent).await?;
  Ok(Json(SubmitQuizOut::new(report, body.time_spent)))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_documents(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.list_documents(DOCUMENT_LIST_LIMIT).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_progress(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let history = state.list_quizzes(QUIZ_LIST_LIMIT).await;
  let documents = state.document_count().await;
  Json(progress::summarize(&history, documents, Utc::now()))
}

// --- Request body decoding ---

/// Read the quiz source from either a multipart upload (`pdfFile`) or a JSON body (`text`).
async fn read_source(state: &Arc<AppState>, req: Request) -> Result<QuizSource, AppError> {
  let is_multipart = content_type(&req).is_some_and(|ct| ct.starts_with("multipart/form-data"));

  if is_multipart {
    let multipart = Multipart::from_request(req, state)
      .await
      .map_err(|e| AppError::Validation(e.body_text()))?;
    return read_pdf_source(state, multipart).await;
  }

  let body: SourceIn = read_json_or_default(state, req).await?;
  let text = body.text.filter(|t| !t.is_empty()).ok_or_else(|| AppError::Validation(TEXT_REQUIRED.into()))?;
  Ok(QuizSource { text, title: body.title, file_name: None, num_questions: body.num_questions })
}

fn content_type(req: &Request) -> Option<&str> {
  req.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
}

/// Decode a JSON body. A blank body or a non-JSON Content-Type reads as the
/// empty request, so the field checks report what is missing. Broken JSON is a 400.
async fn read_json_or_default<T>(state: &Arc<AppState>, req: Request) -> Result<T, AppError>
where
  T: DeserializeOwned + Default,
{
  let is_json = content_type(&req).is_some_and(|ct| ct.starts_with("application/json"));
  let bytes = Bytes::from_request(req, state)
    .await
    .map_err(|e| AppError::Validation(e.body_text()))?;

  if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
    return Ok(T::default());
  }
  serde_json::from_slice(&bytes)
    .map_err(|e| AppError::Validation(format!("Failed to parse the request body as JSON: {}", e)))
}

async fn read_pdf_source(state: &AppState, mut multipart: Multipart) -> Result<QuizSource, AppError> {
  let mut source = QuizSource::default();
  let mut pdf: Option<Vec<u8>> = None;

  while let Some(field) = multipart.next_field().await.map_err(|e| AppError::Validation(e.body_text()))? {
    let name = field.name().map(str::to_owned);
    match name.as_deref() {
      Some(PDF_FIELD) => {
        source.file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|e| AppError::Validation(e.body_text()))?;
        pdf = Some(bytes.to_vec());
      }
      Some("numQuestions") => {
        let raw = field.text().await.map_err(|e| AppError::Validation(e.body_text()))?;
        source.num_questions = raw.trim().parse().ok();
      }
      Some("title") => {
        source.title = Some(field.text().await.map_err(|e| AppError::Validation(e.body_text()))?);
      }
      _ => {}
    }
  }

  let bytes = pdf.filter(|b| !b.is_empty()).ok_or_else(|| AppError::Validation(PDF_REQUIRED.into()))?;
  info!(target: "quiz", file = ?source.file_name, bytes = bytes.len(), "PDF upload received");

  let text = state.extractor.extract_text(bytes).await?;
  if text.trim().is_empty() {
    return Err(AppError::Validation(PDF_EMPTY.into()));
  }
  source.text = text;
  Ok(source)
}
