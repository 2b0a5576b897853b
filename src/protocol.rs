//! Public request/response structs for the HTTP API (serde ready), plus the
//! boundary validation that turns raw query parameters into a round request.
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{GameMode, Task};
use crate::error::ApiError;
use crate::evaluate::Verdict;
use crate::levels::{LevelBounds, LevelProfile};
use crate::stats::LevelStats;
use crate::util::parse_integral;

/// Highest level accepted by the round endpoint (resolution clamps further).
pub const MAX_LEVEL_PARAM: i64 = 99;
pub const DEFAULT_ROUND_TASKS: usize = 10;
pub const MAX_ROUND_TASKS: usize = 50;

//
// Round fetch
//

/// Raw query of `GET /api/v1/tasks/new`. Strings so that bad values produce
/// our own JSON errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct RoundQuery {
  pub level: Option<String>,
  pub num: Option<String>,
  pub count: Option<String>,
  pub mode: Option<String>,
  pub seed: Option<String>,
}

/// Validated, defaulted round request handed to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRequest {
  pub level: i64,
  pub count: usize,
  pub mode: GameMode,
  pub seed: Option<u64>,
}

impl RoundQuery {
  /// - `level`: required integer in [1, MAX_LEVEL_PARAM]
  /// - `num` (alias `count`): default 10, clamped to [1, MAX_ROUND_TASKS]
  /// - `mode`: mixed/add/sub/mul, unknown values mean mixed
  /// - `seed`: optional u64
  pub fn validate(&self) -> Result<RoundRequest, ApiError> {
    let raw_level = self.level.as_deref().ok_or_else(|| ApiError::InvalidParameter {
      name: "level",
      reason: "missing".into(),
    })?;
    let level = parse_integral(raw_level)
      .filter(|l| (1..=MAX_LEVEL_PARAM).contains(l))
      .ok_or_else(|| ApiError::InvalidParameter {
        name: "level",
        reason: format!("expected an integer in [1, {MAX_LEVEL_PARAM}], got '{raw_level}'"),
      })?;

    let count = self
      .num
      .as_deref()
      .or(self.count.as_deref())
      .and_then(parse_integral)
      .map_or(DEFAULT_ROUND_TASKS, |n| n.clamp(1, MAX_ROUND_TASKS as i64) as usize);

    let mode = self.mode.as_deref().map(GameMode::parse_lenient).unwrap_or_default();

    let seed = match self.seed.as_deref() {
      None => None,
      Some(s) => Some(s.trim().parse::<u64>().map_err(|_| ApiError::InvalidParameter {
        name: "seed",
        reason: format!("expected an unsigned integer, got '{s}'"),
      })?),
    };

    Ok(RoundRequest { level, count, mode, seed })
  }
}

//
// Answer evaluation
//

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
  pub task: Task,
  pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOut {
  pub verdict: Verdict,
  /// `None` when the answer was blank and therefore not scored.
  pub correct: Option<bool>,
  pub correct_answer: i64,
}

//
// Outcome recording
//

#[derive(Debug, Deserialize)]
pub struct OutcomeIn {
  pub level: u32,
  pub correct: u32,
  pub total: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeOut {
  pub accuracy: f64,
  pub next_level: u32,
  pub level_stats: LevelStats,
}

//
// Misc
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelsOut {
  #[serde(flatten)]
  pub bounds: LevelBounds,
  pub profiles: Vec<LevelProfile>,
}

#[derive(Serialize)]
pub struct HealthOut {
  pub ok: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn query(level: Option<&str>, num: Option<&str>, mode: Option<&str>) -> RoundQuery {
    RoundQuery {
      level: level.map(Into::into),
      num: num.map(Into::into),
      mode: mode.map(Into::into),
      ..Default::default()
    }
  }

  #[test]
  fn defaults_and_clamping() {
    let r = query(Some("3"), None, None).validate().unwrap();
    assert_eq!(r, RoundRequest { level: 3, count: 10, mode: GameMode::Mixed, seed: None });

    assert_eq!(query(Some("3"), Some("500"), None).validate().unwrap().count, 50);
    assert_eq!(query(Some("3"), Some("0"), None).validate().unwrap().count, 1);
    assert_eq!(query(Some("3"), Some("junk"), None).validate().unwrap().count, 10);
    assert_eq!(query(Some("3"), None, Some("sub")).validate().unwrap().mode, GameMode::Sub);
    assert_eq!(query(Some("3"), None, Some("weird")).validate().unwrap().mode, GameMode::Mixed);
  }

  #[test]
  fn count_alias() {
    let q = RoundQuery { level: Some("2".into()), count: Some("7".into()), ..Default::default() };
    assert_eq!(q.validate().unwrap().count, 7);
  }

  #[test]
  fn level_is_required_and_range_checked() {
    for bad in [None, Some("0"), Some("100"), Some("-1"), Some("two"), Some("2.5")] {
      let err = query(bad, None, None).validate().unwrap_err();
      assert!(matches!(err, ApiError::InvalidParameter { name: "level", .. }), "{bad:?}");
    }
    assert_eq!(query(Some("99"), None, None).validate().unwrap().level, 99);
  }

  #[test]
  fn seed_must_be_unsigned() {
    let q = RoundQuery { level: Some("1".into()), seed: Some("42".into()), ..Default::default() };
    assert_eq!(q.validate().unwrap().seed, Some(42));
    let q = RoundQuery { level: Some("1".into()), seed: Some("-4".into()), ..Default::default() };
    assert!(q.validate().is_err());
  }
}
