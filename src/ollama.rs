//! Minimal Ollama client for quiz generation.
//!
//! One non-streaming `POST` per call, bounded by a client timeout, no retries.
//! Calls are instrumented and log model name, latency and response size (not contents).
//!
//! `Generator` is the seam the rest of the service depends on, so handlers
//! can run against a fake in tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Settings;
use crate::util::trunc_for_log;

/// Anything that turns a prompt into raw model text.
#[async_trait]
pub trait Generator: Send + Sync {
  async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
  /// Endpoint unreachable: refused, DNS failure or timed out.
  #[error("Failed to connect to Ollama API. Please ensure Ollama is running.")]
  Connection { endpoint: String, reason: String },
  /// Endpoint answered, but not with a usable response.
  #[error("Failed to get response from Ollama.")]
  Upstream { status: Option<u16>, body: Option<String>, reason: String },
}

#[derive(Clone)]
pub struct Ollama {
  pub client: reqwest::Client,
  pub url: String,
  pub model: String,
}

impl Ollama {
  pub fn new(url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, url: url.into(), model: model.into() })
  }

  pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
    Self::new(settings.ollama_url.clone(), settings.ollama_model.clone(), settings.generation_timeout)
  }

  fn transport_error(&self, e: reqwest::Error) -> GenerateError {
    if e.is_connect() || e.is_timeout() {
      error!(endpoint = %self.url, error = %e, "Ollama unreachable. Is it running and accessible?");
      GenerateError::Connection { endpoint: self.url.clone(), reason: e.to_string() }
    } else {
      error!(endpoint = %self.url, error = %e, "Error communicating with Ollama");
      GenerateError::Upstream { status: e.status().map(|s| s.as_u16()), body: None, reason: e.to_string() }
    }
  }
}

#[async_trait]
impl Generator for Ollama {
  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
    let req = GenerateRequest { model: &self.model, prompt, stream: false };
    let start = Instant::now();

    let res = self.client.post(&self.url)
      .header(USER_AGENT, "readquiz-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .json(&req).send().await.map_err(|e| self.transport_error(e))?;

    let status = res.status();
    let body = res.text().await.map_err(|e| self.transport_error(e))?;
    let elapsed = start.elapsed();

    if !status.is_success() {
      let reason = extract_ollama_error(&body).unwrap_or_else(|| format!("HTTP {}", status));
      error!(?elapsed, status = status.as_u16(), body = %trunc_for_log(&body, 300), "Ollama returned an error status");
      return Err(GenerateError::Upstream { status: Some(status.as_u16()), body: Some(body), reason });
    }

    let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
      error!(?elapsed, error = %e, body = %trunc_for_log(&body, 300), "Ollama response is not a generate payload");
      GenerateError::Upstream { status: Some(status.as_u16()), body: Some(body.clone()), reason: e.to_string() }
    })?;

    info!(?elapsed, response_len = parsed.response.len(), "Ollama response received");
    Ok(parsed.response)
  }
}

// --- Wire DTOs ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
  model: &'a str,
  prompt: &'a str,
  stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
  response: String,
}

/// Try to extract the message from an Ollama error body (`{"error": "..."}`).
fn extract_ollama_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error)
}
