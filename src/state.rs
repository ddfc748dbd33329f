//! Application state: settings, prompt config, injected collaborators and
//! the in-memory document/quiz stores.
//!
//! The stores stand in for an external entity service. They are process-local
//! and lost on restart.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::config::{QuizConfig, Settings};
use crate::domain::{Document, Quiz};
use crate::error::AppError;
use crate::ollama::Generator;
use crate::pdf::TextExtractor;
use crate::scoring::{score_quiz, ScoreReport};

pub const QUIZ_LIST_LIMIT: usize = 50;
pub const DOCUMENT_LIST_LIMIT: usize = 20;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub quiz_config: QuizConfig,
    pub generator: Arc<dyn Generator>,
    pub extractor: Arc<dyn TextExtractor>,
    pub documents: Arc<RwLock<HashMap<String, Document>>>,
    pub quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        quiz_config: QuizConfig,
        generator: Arc<dyn Generator>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            settings,
            quiz_config,
            generator,
            extractor,
            documents: Arc::new(RwLock::new(HashMap::new())),
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[instrument(level = "debug", skip(self, d), fields(id = %d.id))]
    pub async fn insert_document(&self, d: Document) {
        self.documents.write().await.insert(d.id.clone(), d);
    }

    #[instrument(level = "debug", skip(self, q), fields(id = %q.id))]
    pub async fn insert_quiz(&self, q: Quiz) {
        self.quizzes.write().await.insert(q.id.clone(), q);
    }

    pub async fn get_quiz(&self, id: &str) -> Option<Quiz> {
        self.quizzes.read().await.get(id).cloned()
    }

    /// Most recent first, capped at `limit`.
    pub async fn list_quizzes(&self, limit: usize) -> Vec<Quiz> {
        let mut all: Vec<Quiz> = self.quizzes.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        all
    }

    /// Most recent first, capped at `limit`.
    pub async fn list_documents(&self, limit: usize) -> Vec<Document> {
        let mut all: Vec<Document> = self.documents.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit);
        all
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Score and close a quiz. Runs under the store's write lock so a quiz is
    /// completed at most once; later submissions are rejected.
    #[instrument(level = "info", skip(self, answers), fields(%id, answered = answers.len()))]
    pub async fn complete_quiz(
        &self,
        id: &str,
        answers: &HashMap<usize, String>,
        time_spent: Option<u64>,
    ) -> Result<ScoreReport, AppError> {
        let mut quizzes = self.quizzes.write().await;
        let quiz = quizzes
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz {} not found.", id)))?;

        if quiz.is_completed() {
            warn!(target: "quiz", %id, "Rejected repeat submission");
            return Err(AppError::Conflict("Quiz has already been submitted.".into()));
        }

        let report = score_quiz(&quiz.questions, answers)?;
        quiz.score = Some(report.score);
        quiz.time_spent = time_spent;
        quiz.completed_at = Some(Utc::now());
        quiz.questions = report.questions.clone();

        info!(target: "quiz", %id, score = report.score, total = report.total_questions, percentage = report.percentage, "Quiz submitted");
        Ok(report)
    }
}
