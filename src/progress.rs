//! Level progression after a completed round.

use crate::domain::RoundOutcome;
use crate::levels::LevelBounds;

/// Accuracy at or above which the level goes up.
pub const LEVEL_UP_ACCURACY: f64 = 0.85;
/// Accuracy at or below which the level goes down.
pub const LEVEL_DOWN_ACCURACY: f64 = 0.40;

/// Next level from a single outcome, clamped to `bounds`. No history involved.
pub fn next_level(current: u32, outcome: &RoundOutcome, bounds: LevelBounds) -> u32 {
  let acc = outcome.accuracy();
  let current = i64::from(current);
  let next = if acc >= LEVEL_UP_ACCURACY {
    current + 1
  } else if acc <= LEVEL_DOWN_ACCURACY {
    current - 1
  } else {
    current
  };
  bounds.clamp(next)
}
