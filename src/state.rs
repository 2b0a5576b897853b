//! Application state: the level table, the outcome statistics store, and the
//! operations handlers call.
//!
//! This module owns:
//!   - the level table (loaded once, read-only, shared without locking)
//!   - the statistics store (in-memory, behind an RwLock)
//!
//! Round generation touches no shared mutable state: each request builds its
//! own RNG, seeded when the client passes `seed`.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::{load_level_table_from_env, ConfigError};
use crate::domain::{Round, RoundOutcome};
use crate::entropy::round_rng;
use crate::levels::LevelTable;
use crate::progress::next_level;
use crate::protocol::RoundRequest;
use crate::round::generate_round;
use crate::stats::{LevelStats, Stats};

#[derive(Clone)]
pub struct AppState {
  pub levels: Arc<LevelTable>,
  pub stats: Arc<RwLock<Stats>>,
}

impl AppState {
  /// Build state from env: load the level table (or the built-in one).
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Result<Self, ConfigError> {
    let table = load_level_table_from_env()?;
    Ok(Self::with_table(table))
  }

  pub fn with_table(table: LevelTable) -> Self {
    let bounds = table.bounds();
    for p in table.profiles() {
      info!(
        target: "config",
        level = p.level,
        ops = ?p.allowed_ops,
        patterns = p.patterns.len(),
        expr_chance = p.expr_chance,
        "Level profile"
      );
    }
    info!(target: "arith_backend", min_level = bounds.min_level, max_level = bounds.max_level, "Level table ready");

    Self {
      levels: Arc::new(table),
      stats: Arc::new(RwLock::new(Stats::default())),
    }
  }

  /// Generate a full round for a validated request.
  #[instrument(level = "debug", skip(self), fields(level = req.level, count = req.count, mode = req.mode.as_str()))]
  pub fn new_round(&self, req: &RoundRequest) -> Round {
    let mut rng = round_rng(req.seed);
    generate_round(&self.levels, req.level, req.count, req.mode, &mut rng)
  }

  /// Record `outcome` for `level` and compute the next level.
  #[instrument(level = "debug", skip(self))]
  pub async fn record_outcome(&self, level: u32, outcome: RoundOutcome) -> (u32, LevelStats) {
    let bounds = self.levels.bounds();
    let level = bounds.clamp(i64::from(level));
    let next = next_level(level, &outcome, bounds);
    let level_stats = {
      let mut stats = self.stats.write().await;
      stats.record(level, outcome, Utc::now()).clone()
    };
    (next, level_stats)
  }

  pub async fn stats_snapshot(&self) -> Stats {
    self.stats.read().await.clone()
  }

  pub async fn clear_stats(&self) {
    self.stats.write().await.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::builtin_level_table;
  use crate::domain::GameMode;

  fn state() -> AppState {
    AppState::with_table(builtin_level_table().unwrap())
  }

  #[test]
  fn seeded_requests_repeat() {
    let s = state();
    let req = RoundRequest { level: 4, count: 12, mode: GameMode::Mixed, seed: Some(5) };
    let a = s.new_round(&req);
    let b = s.new_round(&req);
    let answers = |r: &Round| r.tasks.iter().map(|t| t.correct_answer()).collect::<Vec<_>>();
    assert_eq!(answers(&a), answers(&b));
  }

  #[tokio::test]
  async fn outcomes_feed_progression_and_stats() {
    let s = state();
    let (next, lvl) = s.record_outcome(3, RoundOutcome { correct: 9, total: 10 }).await;
    assert_eq!(next, 4);
    assert_eq!(lvl.rounds.len(), 1);

    let (next, _) = s.record_outcome(6, RoundOutcome { correct: 10, total: 10 }).await;
    assert_eq!(next, 6);

    // Levels above the table are recorded under the top level.
    let (next, lvl) = s.record_outcome(42, RoundOutcome { correct: 5, total: 10 }).await;
    assert_eq!(next, 6);
    assert_eq!(lvl.rounds.len(), 2);

    assert_eq!(s.stats_snapshot().await.overall.rounds, 3);
    s.clear_stats().await;
    assert_eq!(s.stats_snapshot().await.overall.rounds, 0);
  }
}
