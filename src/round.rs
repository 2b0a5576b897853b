//! Round generation: one resolved profile, `count` synthesized tasks.

use uuid::Uuid;

use crate::domain::{GameMode, Round};
use crate::entropy::Entropy;
use crate::levels::{LevelProfile, LevelTable};
use crate::synth::synthesize;

/// Synthesize `count` tasks (at least one) from `profile`, in presentation order.
pub fn generate_from_profile<E: Entropy + ?Sized>(profile: &LevelProfile, count: usize, rng: &mut E) -> Round {
  let tasks = (0..count.max(1)).map(|_| synthesize(profile, rng)).collect();
  Round {
    round_id: Uuid::new_v4().to_string(),
    tasks,
  }
}

/// Resolve `level` (restricted by `mode`) and generate a round of `count` tasks.
pub fn generate_round<E: Entropy + ?Sized>(
  table: &LevelTable,
  level: i64,
  count: usize,
  mode: GameMode,
  rng: &mut E,
) -> Round {
  let profile = table.resolve_for_mode(level, mode);
  generate_from_profile(&profile, count, rng)
}
