//! ReadQuiz · reading-comprehension quiz backend
//!
//! - Axum HTTP API
//! - Quiz generation through a local Ollama server
//! - In-memory document/quiz records with scoring and progress stats

pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod logic;
pub mod ollama;
pub mod pdf;
pub mod progress;
pub mod prompt;
pub mod protocol;
pub mod routes;
pub mod schema;
pub mod scoring;
pub mod state;
pub mod telemetry;
pub mod util;

pub use routes::build_router;
