//! Public request/response DTOs for the HTTP API (serde ready).
//! Domain entities (`Quiz`, `Document`) are serialized as-is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scoring::{Performance, ScoreReport};

/// JSON body of `POST /api/quiz/generate` and `POST /api/quizzes`.
/// Every field is optional at the serde level so a missing `text` yields the
/// API's own 400 message instead of a generic deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct SourceIn {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "numQuestions")]
    pub num_questions: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PromptIn {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromptOut {
    pub response: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmitQuizIn {
    /// Question index -> chosen option text. Unanswered indices are absent.
    #[serde(default)]
    pub answers: HashMap<usize, String>,
    #[serde(default, rename = "timeSpent")]
    pub time_spent: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizOut {
    #[serde(flatten)]
    pub report: ScoreReport,
    pub time_spent: Option<u64>,
    pub performance: Performance,
}

impl SubmitQuizOut {
    pub fn new(report: ScoreReport, time_spent: Option<u64>) -> Self {
        let performance = Performance::from_percentage(report.percentage);
        Self { report, time_spent, performance }
    }
}
