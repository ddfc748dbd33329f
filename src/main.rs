//! ReadQuiz · reading-comprehension quiz backend
//!
//! Important env variables (see `config::Settings` for the full list):
//!   PORT              : u16 (default 5000)
//!   OLLAMA_API_URL    : default "http://localhost:11434/api/generate"
//!   OLLAMA_MODEL      : default "llama2"
//!   QUIZ_CONFIG_PATH  : path to TOML config (prompt templates, default question count)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;

use readquiz_backend::config::{load_quiz_config, Settings};
use readquiz_backend::ollama::Ollama;
use readquiz_backend::pdf::PdfTextExtractor;
use readquiz_backend::state::AppState;
use readquiz_backend::{build_router, telemetry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenvy::dotenv().ok();
  telemetry::init_tracing();

  let settings = Settings::from_env();
  let quiz_config = load_quiz_config(settings.quiz_config_path.as_deref()).unwrap_or_default();

  let ollama = Ollama::from_settings(&settings)?;
  info!(
    target: "readquiz_backend",
    url = %ollama.url,
    model = %ollama.model,
    timeout = ?settings.generation_timeout,
    "Generation endpoint configured"
  );

  let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
  let state = Arc::new(AppState::new(settings, quiz_config, Arc::new(ollama), Arc::new(PdfTextExtractor)));
  let app = build_router(state);

  let listener = TcpListener::bind(addr).await?;
  info!(target: "readquiz_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "readquiz_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "readquiz_backend", "Shutdown signal received");
}
