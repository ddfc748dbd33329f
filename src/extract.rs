//! Locate and parse the JSON payload inside raw model output.
//!
//! Models often wrap JSON in a ```json fenced block surrounded by chatter, and
//! sometimes return bare JSON. The fenced interior is tried first; the whole
//! text is the fallback. Both failure reasons are kept for diagnostics.

use serde_json::Value;
use tracing::{debug, warn};

use crate::util::trunc_for_log;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

#[derive(Debug, thiserror::Error)]
#[error("Failed to parse quiz data from AI response.")]
pub struct ParseError {
  /// The untouched model output.
  pub raw: String,
  /// Why the fenced interior failed to parse; None when no fence was found.
  pub fenced: Option<String>,
  /// Why the whole text failed to parse.
  pub direct: String,
}

/// Interior of the first ```json ... ``` block, if the block is closed.
pub fn find_fenced_block(raw: &str) -> Option<&str> {
  let start = raw.find(FENCE_OPEN)? + FENCE_OPEN.len();
  let rest = &raw[start..];
  let end = rest.find(FENCE_CLOSE)?;
  Some(rest[..end].trim())
}

pub fn extract_json(raw: &str) -> Result<Value, ParseError> {
  let fenced = match find_fenced_block(raw) {
    Some(inner) => match serde_json::from_str::<Value>(inner) {
      Ok(v) => {
        debug!(target: "quiz", inner_len = inner.len(), "Parsed fenced JSON block");
        return Ok(v);
      }
      Err(e) => Some(e.to_string()),
    },
    None => None,
  };

  match serde_json::from_str::<Value>(raw.trim()) {
    Ok(v) => Ok(v),
    Err(e) => {
      warn!(
        target: "quiz",
        fenced_error = ?fenced,
        direct_error = %e,
        raw = %trunc_for_log(raw, 500),
        "Model response is not valid JSON"
      );
      Err(ParseError { raw: raw.to_string(), fenced, direct: e.to_string() })
    }
  }
}
