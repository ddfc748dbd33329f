//! Quiz scoring: exact-match comparison of submitted answers against
//! `correct_answer`, plus the derived percentage and performance band.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::Question;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Quiz has no questions to score.")]
pub struct InvalidQuizError;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
  pub score: usize,
  pub total_questions: usize,
  pub percentage: u32,
  /// Input questions with `user_answer` attached (null when unanswered).
  pub questions: Vec<Question>,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Performance {
  Excellent,
  Good,
  KeepPracticing,
}

impl Performance {
  pub fn from_percentage(percentage: u32) -> Self {
    if percentage >= 80 {
      Performance::Excellent
    } else if percentage >= 60 {
      Performance::Good
    } else {
      Performance::KeepPracticing
    }
  }
}

/// Score `answers` (question index -> submitted option text) against `questions`.
/// Indices missing from `answers` count as unanswered; indices beyond the
/// question list are ignored.
pub fn score_quiz(questions: &[Question], answers: &HashMap<usize, String>) -> Result<ScoreReport, InvalidQuizError> {
  let total = questions.len();
  if total == 0 {
    return Err(InvalidQuizError);
  }

  let mut correct = 0usize;
  let questions = questions
    .iter()
    .enumerate()
    .map(|(i, q)| {
      let user_answer = answers.get(&i).filter(|a| !a.is_empty()).cloned();
      if user_answer.as_deref() == Some(q.correct_answer.as_str()) {
        correct += 1;
      }
      Question { user_answer, ..q.clone() }
    })
    .collect();

  Ok(ScoreReport {
    score: correct,
    total_questions: total,
    percentage: percentage(correct, total),
    questions,
  })
}

fn percentage(correct: usize, total: usize) -> u32 {
  ((correct as f64 / total as f64) * 100.0).round() as u32
}
