//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values, in order.
/// Values inserted by an earlier pair are scanned by later pairs, so put free text last.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// True if the char sits in the Hebrew block (U+0590..=U+05FF).
pub fn is_hebrew(ch: char) -> bool {
  ('\u{0590}'..='\u{05FF}').contains(&ch)
}

/// Whitespace-separated token count, used for document metadata.
pub fn word_count(s: &str) -> usize {
  s.split_whitespace().count()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole documents or model responses.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{n} of {n}: {text}", &[("n", "5"), ("text", "body")]);
    assert_eq!(out, "5 of 5: body");
  }

  #[test]
  fn hebrew_range_is_inclusive() {
    assert!(is_hebrew('\u{0590}'));
    assert!(is_hebrew('ש'));
    assert!(is_hebrew('\u{05FF}'));
    assert!(!is_hebrew('\u{0600}'));
    assert!(!is_hebrew('a'));
  }

  #[test]
  fn trunc_respects_char_boundaries() {
    let s = "שלום עולם";
    let t = trunc_for_log(s, 3);
    assert!(t.starts_with('ש'));
    assert!(t.ends_with("bytes total)"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }

  #[test]
  fn word_count_splits_on_any_whitespace() {
    assert_eq!(word_count("The sky\tis\n blue."), 4);
    assert_eq!(word_count("   "), 0);
  }
}
