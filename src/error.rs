//! Request-boundary error type.
//!
//! Every pipeline failure converts into `AppError` via `?`, and `AppError`
//! renders as a JSON body with a stable `error` field plus diagnostics
//! (raw model text, offending payload, upstream status) where available.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;

use crate::extract::ParseError;
use crate::ollama::GenerateError;
use crate::pdf::ExtractError;
use crate::schema::SchemaError;
use crate::scoring::InvalidQuizError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  /// Missing or malformed request input (400).
  #[error("{0}")]
  Validation(String),

  /// Generation endpoint unreachable or failing (500).
  #[error(transparent)]
  Generate(#[from] GenerateError),

  /// Model output is not JSON (500).
  #[error(transparent)]
  Parse(#[from] ParseError),

  /// Model JSON does not have the question shape (500).
  #[error(transparent)]
  Schema(#[from] SchemaError),

  /// Stored quiz cannot be scored (422).
  #[error(transparent)]
  InvalidQuiz(#[from] InvalidQuizError),

  #[error("{0}")]
  NotFound(String),

  /// Quiz already submitted (409).
  #[error("{0}")]
  Conflict(String),
}

impl From<ExtractError> for AppError {
  fn from(err: ExtractError) -> Self {
    AppError::Validation(err.to_string())
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    AppError::Validation(rejection.body_text())
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let message = self.to_string();
    let (status, body) = match self {
      AppError::Validation(_) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
      AppError::Generate(GenerateError::Connection { endpoint, reason }) => {
        tracing::error!(%endpoint, %reason, "Generation endpoint unreachable");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
      }
      AppError::Generate(GenerateError::Upstream { status, body, reason }) => {
        tracing::error!(?status, %reason, "Generation endpoint failed");
        let mut out = json!({ "error": message });
        if let Some(status) = status {
          out["status"] = json!(status);
        }
        if let Some(body) = body {
          out["upstreamBody"] = json!(body);
        }
        (StatusCode::INTERNAL_SERVER_ERROR, out)
      }
      AppError::Parse(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": message, "rawResponse": e.raw }),
      ),
      AppError::Schema(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": message, "quizData": e.data }),
      ),
      AppError::InvalidQuiz(_) => (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": message })),
      AppError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": message })),
      AppError::Conflict(_) => (StatusCode::CONFLICT, json!({ "error": message })),
    };

    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::Value;

  async fn render(err: AppError) -> (StatusCode, Value) {
    let res = err.into_response();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn validation_is_400_with_message() {
    let (status, body) = render(AppError::Validation("Text content is required to generate a quiz.".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Text content is required to generate a quiz." }));
  }

  #[tokio::test]
  async fn parse_error_carries_raw_response() {
    let err = ParseError { raw: "invalid json".into(), fenced: None, direct: "expected value".into() };
    let (status, body) = render(err.into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to parse quiz data from AI response.");
    assert_eq!(body["rawResponse"], "invalid json");
  }

  #[tokio::test]
  async fn schema_error_carries_quiz_data() {
    let data = json!([{ "question": "Q" }]);
    let err = SchemaError { index: Some(0), field: "options", reason: "missing".into(), data: data.clone() };
    let (status, body) = render(err.into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Invalid quiz data format received from AI.");
    assert_eq!(body["quizData"], data);
  }

  #[tokio::test]
  async fn connection_and_upstream_are_distinct() {
    let (_, conn) = render(GenerateError::Connection { endpoint: "http://x".into(), reason: "refused".into() }.into()).await;
    assert_eq!(conn, json!({ "error": "Failed to connect to Ollama API. Please ensure Ollama is running." }));

    let (status, up) = render(
      GenerateError::Upstream { status: Some(404), body: Some("{\"error\":\"no model\"}".into()), reason: "no model".into() }.into(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(up["error"], "Failed to get response from Ollama.");
    assert_eq!(up["status"], 404);
    assert_eq!(up["upstreamBody"], "{\"error\":\"no model\"}");
  }

  #[tokio::test]
  async fn store_errors_map_to_their_statuses() {
    assert_eq!(render(AppError::InvalidQuiz(InvalidQuizError)).await.0, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(render(AppError::NotFound("Quiz not found.".into())).await.0, StatusCode::NOT_FOUND);
    assert_eq!(render(AppError::Conflict("Quiz already submitted.".into())).await.0, StatusCode::CONFLICT);
  }
}
