//! Shape check for parsed model output.
//!
//! Accepts either a bare array of questions or an object with a `questions`
//! array. Every element needs a non-empty `question`, exactly four string
//! `options` and a non-empty `answer` (or `correct_answer`). One bad element
//! rejects the whole batch.

use serde_json::Value;
use tracing::{error, warn};

use crate::domain::GeneratedQuestion;

pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Debug, thiserror::Error)]
#[error("Invalid quiz data format received from AI.")]
pub struct SchemaError {
  /// Offending element, or None when the container itself is wrong.
  pub index: Option<usize>,
  pub field: &'static str,
  pub reason: String,
  /// The parsed payload as received.
  pub data: Value,
}

impl SchemaError {
  fn new(data: &Value, index: Option<usize>, field: &'static str, reason: impl Into<String>) -> Self {
    let e = Self { index, field, reason: reason.into(), data: data.clone() };
    error!(target: "quiz", index = ?e.index, field = e.field, reason = %e.reason, "Quiz payload failed validation");
    e
  }
}

pub fn validate_questions(data: &Value) -> Result<Vec<GeneratedQuestion>, SchemaError> {
  let items = match data {
    Value::Array(items) => items,
    Value::Object(map) => match map.get("questions") {
      Some(Value::Array(items)) => items,
      Some(_) => return Err(SchemaError::new(data, None, "questions", "`questions` is not an array")),
      None => return Err(SchemaError::new(data, None, "questions", "object has no `questions` array")),
    },
    _ => return Err(SchemaError::new(data, None, "questions", "expected an array of questions")),
  };

  if items.is_empty() {
    return Err(SchemaError::new(data, None, "questions", "no questions were generated"));
  }

  items.iter().enumerate().map(|(i, item)| validate_one(data, i, item)).collect()
}

fn validate_one(data: &Value, i: usize, item: &Value) -> Result<GeneratedQuestion, SchemaError> {
  let Some(obj) = item.as_object() else {
    return Err(SchemaError::new(data, Some(i), "question", "element is not an object"));
  };

  let question = non_empty_str(obj.get("question"))
    .ok_or_else(|| SchemaError::new(data, Some(i), "question", "missing or empty question text"))?;

  let options = match obj.get("options") {
    Some(Value::Array(opts)) if opts.len() == OPTIONS_PER_QUESTION => opts
      .iter()
      .map(|o| o.as_str().map(str::to_string))
      .collect::<Option<Vec<_>>>()
      .ok_or_else(|| SchemaError::new(data, Some(i), "options", "every option must be a string"))?,
    Some(Value::Array(opts)) => {
      return Err(SchemaError::new(
        data,
        Some(i),
        "options",
        format!("expected {} options, got {}", OPTIONS_PER_QUESTION, opts.len()),
      ))
    }
    _ => return Err(SchemaError::new(data, Some(i), "options", "missing options array")),
  };

  let answer = non_empty_str(obj.get("answer"))
    .or_else(|| non_empty_str(obj.get("correct_answer")))
    .ok_or_else(|| SchemaError::new(data, Some(i), "answer", "missing or empty answer"))?;

  if !options.iter().any(|o| *o == answer) {
    // Scoring relies on verbatim matches; keep the question but make it visible.
    warn!(target: "quiz", index = i, %answer, "Answer does not match any option verbatim");
  }

  Ok(GeneratedQuestion {
    question,
    options,
    answer,
    explanation: non_empty_str(obj.get("explanation")),
    supporting_text: non_empty_str(obj.get("supporting_text")),
  })
}

fn non_empty_str(v: Option<&Value>) -> Option<String> {
  v.and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}
