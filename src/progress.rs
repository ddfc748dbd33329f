//! Dashboard statistics over a user's quiz history.
//!
//! All functions take the history most-recent-first and are pure; "now" is a
//! parameter so the weekly window is testable.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::Quiz;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
  Improving,
  Declining,
  Consistent,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
  pub total_quizzes: usize,
  pub total_documents: usize,
  pub average_score: f64,
  pub weekly_count: usize,
  pub trend: Trend,
  pub highest_score: usize,
}

/// Mean score over completed quizzes; 0 when none are completed.
pub fn average_score(history: &[Quiz]) -> f64 {
  let scores: Vec<usize> = history.iter().filter_map(|q| q.score).collect();
  if scores.is_empty() {
    return 0.0;
  }
  scores.iter().sum::<usize>() as f64 / scores.len() as f64
}

/// Quizzes active within the trailing 7 days from `now`.
pub fn weekly_count(history: &[Quiz], now: DateTime<Utc>) -> usize {
  let week_start = now - Duration::days(7);
  history.iter().filter(|q| q.activity_at() >= week_start).count()
}

/// Compare the two most recent records; a missing score counts as 0.
pub fn trend(history: &[Quiz]) -> Trend {
  match history {
    [latest, previous, ..] => {
      let (latest, previous) = (latest.score.unwrap_or(0), previous.score.unwrap_or(0));
      if latest > previous {
        Trend::Improving
      } else if latest < previous {
        Trend::Declining
      } else {
        Trend::Consistent
      }
    }
    _ => Trend::Consistent,
  }
}

pub fn highest_score(history: &[Quiz]) -> usize {
  history.iter().filter_map(|q| q.score).max().unwrap_or(0)
}

pub fn summarize(history: &[Quiz], total_documents: usize, now: DateTime<Utc>) -> ProgressSummary {
  ProgressSummary {
    total_quizzes: history.len(),
    total_documents,
    average_score: (average_score(history) * 100.0).round() / 100.0,
    weekly_count: weekly_count(history, now),
    trend: trend(history),
    highest_score: highest_score(history),
  }
}
