//! Runtime settings (environment) and quiz prompt configuration (TOML).
//!
//! Environment variables (a `.env` file is honored by `main`):
//!   PORT                    : u16 (default 5000)
//!   OLLAMA_API_URL          : generation endpoint (default "http://localhost:11434/api/generate")
//!   OLLAMA_MODEL            : model name sent with every request (default "llama2")
//!   GENERATION_TIMEOUT_SECS : per-request timeout for the generation call (default 120)
//!   BODY_LIMIT_BYTES        : max request body, PDFs included (default 50 MiB)
//!   QUIZ_CONFIG_PATH        : optional TOML file, see `QuizConfig`

use std::{str::FromStr, time::Duration};

use serde::Deserialize;
use tracing::{error, info, warn};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2";
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;
pub const DEFAULT_QUESTION_COUNT: usize = 5;

#[derive(Clone, Debug)]
pub struct Settings {
  pub port: u16,
  pub ollama_url: String,
  pub ollama_model: String,
  pub generation_timeout: Duration,
  pub body_limit: usize,
  pub quiz_config_path: Option<String>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      ollama_url: DEFAULT_OLLAMA_URL.into(),
      ollama_model: DEFAULT_OLLAMA_MODEL.into(),
      generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
      body_limit: DEFAULT_BODY_LIMIT,
      quiz_config_path: None,
    }
  }
}

impl Settings {
  /// Read settings from the process environment, falling back to defaults
  /// for anything missing or unparsable.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      port: env_parse("PORT").unwrap_or(defaults.port),
      ollama_url: env_string("OLLAMA_API_URL").unwrap_or(defaults.ollama_url),
      ollama_model: env_string("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
      generation_timeout: env_parse::<u64>("GENERATION_TIMEOUT_SECS")
        .map(Duration::from_secs)
        .unwrap_or(defaults.generation_timeout),
      body_limit: env_parse("BODY_LIMIT_BYTES").unwrap_or(defaults.body_limit),
      quiz_config_path: env_string("QUIZ_CONFIG_PATH"),
    }
  }
}

fn env_string(key: &str) -> Option<String> {
  std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
  let raw = env_string(key)?;
  match raw.parse::<T>() {
    Ok(v) => Some(v),
    Err(_) => {
      warn!(target: "readquiz_backend", %key, value = %raw, "Ignoring unparsable environment value");
      None
    }
  }
}

/// Optional TOML configuration. Every key may be omitted.
///
/// ```toml
/// default_question_count = 5
///
/// [prompts]
/// english_instructions = "... {count} ... {text} ..."
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default = "default_question_count")]
  pub default_question_count: usize,
}

fn default_question_count() -> usize { DEFAULT_QUESTION_COUNT }

impl Default for QuizConfig {
  fn default() -> Self {
    Self { prompts: Prompts::default(), default_question_count: DEFAULT_QUESTION_COUNT }
  }
}

/// Prompt templates for quiz generation. `{count}` and `{text}` are substituted.
/// The schema preamble and JSON structure are appended verbatim after the instructions.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub english_instructions: String,
  pub hebrew_instructions: String,
  pub schema_preamble: String,
  pub json_structure: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      english_instructions: "Based on the following text, create exactly {count} multiple choice reading comprehension questions. Each question should test understanding of the content, not trivial details. For each question, provide 4 options with only one correct answer. Also provide a brief explanation for the correct answer and identify the supporting text from the passage.\n\nText: \"{text}\"\n\nPlease format your response as a JSON object. VERY IMPORTANT: The 'correct_answer' field must contain the full text of the correct option, not its index or letter.".into(),
      hebrew_instructions: "בהתבסס על הטקסט הבא, צור בדיוק {count} שאלות רב-ברירה (אמריקאיות) לבדיקת הבנת הנקרא. כל שאלה צריכה לבחון הבנה של התוכן. עבור כל שאלה, ספק 4 אפשרויות עם תשובה נכונה אחת בלבד. בנוסף, ספק הסבר קצר לתשובה הנכונה וציין את קטע הטקסט התומך מהמאמר.\n\nטקסט: \"{text}\"\n\nאנא פרמט את תגובתך כאובייקט JSON. חשוב מאוד: השדה 'correct_answer' צריך להכיל את הטקסט המלא של התשובה הנכונה, לא את האינדקס או האות שלה.".into(),
      schema_preamble: "Your response MUST be a JSON object with the following structure:".into(),
      json_structure: r#"{
  "questions": [
    {
      "question": "The question text.",
      "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
      "correct_answer": "The full text of the correct option.",
      "explanation": "An explanation of why the answer is correct.",
      "supporting_text": "A relevant quote from the source text."
    }
  ]
}"#.into(),
    }
  }
}

/// Attempt to load `QuizConfig` from `path`. On any IO/parsing error, returns None.
pub fn load_quiz_config(path: Option<&str>) -> Option<QuizConfig> {
  let path = path?;
  match std::fs::read_to_string(path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "readquiz_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "readquiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "readquiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_remaining_defaults() {
    let cfg: QuizConfig = toml::from_str(
      r#"
      default_question_count = 3

      [prompts]
      english_instructions = "Make {count} questions about: {text}"
      "#,
    )
    .unwrap();

    assert_eq!(cfg.default_question_count, 3);
    assert_eq!(cfg.prompts.english_instructions, "Make {count} questions about: {text}");
    assert_eq!(cfg.prompts.hebrew_instructions, Prompts::default().hebrew_instructions);
    assert!(cfg.prompts.json_structure.contains("correct_answer"));
  }

  #[test]
  fn empty_toml_is_all_defaults() {
    let cfg: QuizConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.default_question_count, DEFAULT_QUESTION_COUNT);
  }

  #[test]
  fn missing_config_file_yields_none() {
    assert!(load_quiz_config(None).is_none());
    assert!(load_quiz_config(Some("/definitely/not/here.toml")).is_none());
  }

  #[test]
  fn defaults_match_local_ollama() {
    let s = Settings::default();
    assert_eq!(s.port, 5000);
    assert_eq!(s.ollama_url, "http://localhost:11434/api/generate");
    assert_eq!(s.body_limit, 52_428_800);
  }
}
