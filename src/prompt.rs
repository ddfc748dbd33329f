//! Quiz prompt assembly: language-aware instructions, the literal source text,
//! and the required JSON output shape.

use tracing::debug;

use crate::config::Prompts;
use crate::domain::Language;
use crate::util::fill_template;

/// Build the generation prompt for `count` questions over `text`.
pub fn build_quiz_prompt(prompts: &Prompts, text: &str, count: usize) -> String {
  let language = Language::detect(text);
  let template = match language {
    Language::Hebrew => &prompts.hebrew_instructions,
    Language::English => &prompts.english_instructions,
  };
  let count = count.to_string();
  let instructions = fill_template(template, &[("count", &count), ("text", text)]);
  debug!(target: "quiz", ?language, %count, text_len = text.len(), "Built quiz prompt");
  format!("{}\n\n{}\n{}", instructions, prompts.schema_preamble, prompts.json_structure)
}
