//! Outcome statistics: best score per level, bounded history and overall totals.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::RoundOutcome;

/// Rounds kept per level; older entries are dropped first.
pub const HISTORY_LIMIT: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundEntry {
  pub ts: DateTime<Utc>,
  pub correct: u32,
  pub total: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
  /// 0..1
  pub best_accuracy: f64,
  pub best_correct: u32,
  pub best_total: u32,
  /// Most recent last.
  pub rounds: VecDeque<RoundEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OverallStats {
  pub rounds: u64,
  pub correct: u64,
  pub total: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
  pub by_level: BTreeMap<u32, LevelStats>,
  pub overall: OverallStats,
}

impl Stats {
  /// Record one completed round and return the level's updated stats.
  pub fn record(&mut self, level: u32, outcome: RoundOutcome, ts: DateTime<Utc>) -> &LevelStats {
    self.overall.rounds += 1;
    self.overall.correct += u64::from(outcome.correct);
    self.overall.total += u64::from(outcome.total);

    let acc = outcome.accuracy();
    let entry = self.by_level.entry(level).or_default();
    if acc > entry.best_accuracy {
      entry.best_accuracy = acc;
      entry.best_correct = outcome.correct;
      entry.best_total = outcome.total;
    }
    entry.rounds.push_back(RoundEntry { ts, correct: outcome.correct, total: outcome.total });
    while entry.rounds.len() > HISTORY_LIMIT {
      entry.rounds.pop_front();
    }
    entry
  }

  pub fn clear(&mut self) {
    *self = Stats::default();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn outcome(correct: u32, total: u32) -> RoundOutcome {
    RoundOutcome { correct, total }
  }

  #[test]
  fn tracks_best_round_per_level() {
    let mut stats = Stats::default();
    let now = Utc::now();
    stats.record(2, outcome(6, 10), now);
    stats.record(2, outcome(9, 10), now);
    let lvl = stats.record(2, outcome(7, 10), now).clone();

    assert_eq!(lvl.best_accuracy, 0.9);
    assert_eq!((lvl.best_correct, lvl.best_total), (9, 10));
    assert_eq!(lvl.rounds.len(), 3);
    assert_eq!(lvl.rounds.back().map(|r| r.correct), Some(7));
    assert_eq!(stats.overall, OverallStats { rounds: 3, correct: 22, total: 30 });
  }

  #[test]
  fn history_is_bounded() {
    let mut stats = Stats::default();
    let now = Utc::now();
    for i in 0..(HISTORY_LIMIT as u32 + 5) {
      stats.record(1, outcome(i % 10, 10), now);
    }
    let lvl = &stats.by_level[&1];
    assert_eq!(lvl.rounds.len(), HISTORY_LIMIT);
    assert_eq!(lvl.rounds.front().map(|r| r.correct), Some(5));
    assert_eq!(stats.overall.rounds, HISTORY_LIMIT as u64 + 5);
  }

  #[test]
  fn clear_resets_everything() {
    let mut stats = Stats::default();
    stats.record(4, outcome(1, 1), Utc::now());
    stats.clear();
    assert_eq!(stats, Stats::default());
  }

  #[test]
  fn serializes_camel_case() {
    let mut stats = Stats::default();
    stats.record(3, outcome(5, 10), Utc::now());
    let v = serde_json::to_value(&stats).unwrap();
    assert_eq!(v["byLevel"]["3"]["bestCorrect"], 5);
    assert_eq!(v["overall"]["total"], 10);
  }
}
