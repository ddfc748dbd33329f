//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - the generation pipeline: prompt -> generator -> JSON extraction -> schema check
//!   - the raw generation passthrough
//!   - quiz creation from a source text (document + quiz records)

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{Document, GeneratedQuestion, Quiz};
use crate::error::AppError;
use crate::extract::extract_json;
use crate::prompt::build_quiz_prompt;
use crate::schema::validate_questions;
use crate::state::AppState;
use crate::util::word_count;

pub const TEXT_REQUIRED: &str = "Text content is required to generate a quiz.";
pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const DEFAULT_READING_LEVEL: &str = "Intermediate";
pub const UNTITLED: &str = "Untitled document";

/// Source text for a quiz, from either a JSON body or an uploaded PDF.
#[derive(Clone, Debug, Default)]
pub struct QuizSource {
  pub text: String,
  pub title: Option<String>,
  pub file_name: Option<String>,
  pub num_questions: Option<usize>,
}

impl QuizSource {
  /// Requested count, where a missing or zero count means the configured default.
  pub fn question_count(&self, default: usize) -> usize {
    self.num_questions.filter(|n| *n > 0).unwrap_or(default)
  }

  /// Explicit title, else file name without a `.pdf` suffix, else a placeholder.
  pub fn resolved_title(&self) -> String {
    let explicit = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let from_file = self
      .file_name
      .as_deref()
      .map(|f| f.strip_suffix(".pdf").or_else(|| f.strip_suffix(".PDF")).unwrap_or(f))
      .filter(|t| !t.is_empty());
    explicit.or(from_file).unwrap_or(UNTITLED).to_string()
  }
}

/// Run the full generation pipeline over `text`.
#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub async fn generate_questions(state: &AppState, text: &str, count: usize) -> Result<Vec<GeneratedQuestion>, AppError> {
  let prompt = build_quiz_prompt(&state.quiz_config.prompts, text, count);
  let raw = state.generator.generate(&prompt).await?;
  let parsed = extract_json(&raw)?;
  let questions = validate_questions(&parsed)?;
  info!(target: "quiz", requested = count, generated = questions.len(), "Quiz questions generated");
  Ok(questions)
}

/// Forward a caller-supplied prompt to the generator unchanged.
#[instrument(level = "info", skip(state, prompt), fields(prompt_len = prompt.as_deref().map_or(0, str::len)))]
pub async fn passthrough(state: &AppState, prompt: Option<String>) -> Result<String, AppError> {
  let prompt = prompt.filter(|p| !p.is_empty()).ok_or_else(|| AppError::Validation(PROMPT_REQUIRED.into()))?;
  Ok(state.generator.generate(&prompt).await?)
}

/// Create the document record, generate its questions and store the new quiz.
/// Nothing is stored when generation fails.
#[instrument(level = "info", skip(state, source), fields(text_len = source.text.len()))]
pub async fn create_quiz(state: &AppState, source: QuizSource) -> Result<Quiz, AppError> {
  let count = source.question_count(state.quiz_config.default_question_count);
  let generated = generate_questions(state, &source.text, count).await?;

  let now = Utc::now();
  let title = source.resolved_title();
  let document = Document {
    id: Uuid::new_v4().to_string(),
    title: title.clone(),
    word_count: word_count(&source.text),
    content: source.text,
    file_url: None,
    reading_level: DEFAULT_READING_LEVEL.into(),
    created_at: now,
  };

  let questions: Vec<_> = generated.into_iter().map(GeneratedQuestion::into_question).collect();
  let quiz = Quiz {
    id: Uuid::new_v4().to_string(),
    document_id: document.id.clone(),
    title,
    total_questions: questions.len(),
    score: None,
    time_spent: None,
    completed_at: None,
    created_at: now,
    questions,
  };

  info!(target: "quiz", quiz_id = %quiz.id, document_id = %document.id, words = document.word_count, "Quiz created");
  state.insert_document(document).await;
  state.insert_quiz(quiz.clone()).await;
  Ok(quiz)
}
