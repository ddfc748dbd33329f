//! Domain models: source documents, quizzes and their questions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::is_hebrew;

/// Language of the source text, which selects the prompt instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
  English,
  Hebrew,
}

impl Language {
  /// Hebrew if any code point falls in U+0590..=U+05FF, English otherwise.
  pub fn detect(text: &str) -> Self {
    if text.chars().any(is_hebrew) { Language::Hebrew } else { Language::English }
  }
}

/// A question exactly as the generation pipeline validated it.
/// This is the flat wire shape returned by `POST /api/quiz/generate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
  pub question: String,
  pub options: Vec<String>,
  pub answer: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub supporting_text: Option<String>,
}

impl GeneratedQuestion {
  pub fn into_question(self) -> Question {
    Question {
      question: self.question,
      options: self.options,
      correct_answer: self.answer,
      explanation: self.explanation,
      supporting_text: self.supporting_text,
      user_answer: None,
    }
  }
}

/// Question embedded in a quiz. `correct_answer` and `user_answer` are compared
/// against `options` by exact string equality, with no normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub supporting_text: Option<String>,
  /// Set once at submission; null when the question was left unanswered.
  #[serde(default)]
  pub user_answer: Option<String>,
}

/// Uploaded source document. Immutable after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
  pub id: String,
  pub title: String,
  pub content: String,
  #[serde(default)]
  pub file_url: Option<String>,
  pub word_count: usize,
  pub reading_level: String,
  pub created_at: DateTime<Utc>,
}

/// Generated quiz. Created with `score = None`; completed exactly once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quiz {
  pub id: String,
  pub document_id: String,
  pub title: String,
  pub total_questions: usize,
  #[serde(default)]
  pub score: Option<usize>,
  /// Seconds spent answering, as reported by the client.
  #[serde(default)]
  pub time_spent: Option<u64>,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub questions: Vec<Question>,
}

impl Quiz {
  pub fn is_completed(&self) -> bool {
    self.score.is_some()
  }

  /// Timestamp used for weekly activity: completion time, else creation time.
  pub fn activity_at(&self) -> DateTime<Utc> {
    self.completed_at.unwrap_or(self.created_at)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_hebrew_anywhere_in_text() {
    assert_eq!(Language::detect("The sky is blue."), Language::English);
    assert_eq!(Language::detect("Intro: השמיים כחולים"), Language::Hebrew);
    assert_eq!(Language::detect(""), Language::English);
  }

  #[test]
  fn generated_question_omits_missing_optional_fields() {
    let q = GeneratedQuestion {
      question: "What color is the sky?".into(),
      options: vec!["Red".into(), "Blue".into(), "Green".into(), "Yellow".into()],
      answer: "Blue".into(),
      explanation: None,
      supporting_text: None,
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(
      v,
      serde_json::json!({
        "question": "What color is the sky?",
        "options": ["Red", "Blue", "Green", "Yellow"],
        "answer": "Blue"
      })
    );

    let embedded = q.into_question();
    assert_eq!(embedded.correct_answer, "Blue");
    assert!(embedded.user_answer.is_none());
  }
}
