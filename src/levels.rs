//! Level profiles and the immutable level table.
//!
//! A `LevelProfile` says which operators a level uses, how large operands may
//! get, how often each quantity is hidden and which multi-term patterns are
//! available. The table is loaded once at startup (see `config`) and is only
//! read afterwards, so it is shared without locking.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::{AnswerTarget, GameMode, Operation};

/// Relative likelihoods of hiding the result, the left or the right operand.
///
/// The weights partition [0, 1) in the order result → a → b and are NOT
/// normalized: if they sum to less than 1, `b` absorbs the remainder; if the
/// first two already reach 1, `b` is never chosen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetWeights {
  pub result: f64,
  pub a: f64,
  pub b: f64,
}

impl Default for TargetWeights {
  fn default() -> Self {
    Self { result: 1.0, a: 0.0, b: 0.0 }
  }
}

impl TargetWeights {
  /// Map a uniform draw `r` in [0, 1) onto a hidden quantity.
  pub fn pick(&self, r: f64) -> AnswerTarget {
    if r < self.result {
      AnswerTarget::Result
    } else if r < self.result + self.a {
      AnswerTarget::A
    } else {
      AnswerTarget::B
    }
  }
}

/// Operator family of a multi-term pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
  /// Only additions.
  Sum,
  /// Additions mixed with subtractions.
  Sumdiff,
  Mixed,
}

impl PatternKind {
  pub fn operations(self) -> &'static [Operation] {
    match self {
      PatternKind::Sum => &[Operation::Add],
      PatternKind::Sumdiff | PatternKind::Mixed => &[Operation::Add, Operation::Sub],
    }
  }
}

/// Where the hole of an expression task may be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolePolicy {
  ResultOnly,
  OneOperand,
  ResultOrOneOperand,
}

/// Multi-term expression template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Pattern {
  pub kind: PatternKind,
  pub min_terms: u32,
  pub max_terms: u32,
  pub holes: HolePolicy,
}

/// Largest operand range a profile may declare. Products stay well inside `i64`.
pub const OPERAND_MAX: i64 = 1_000_000;

/// Maximum operand magnitude per operator; 0 means the operator is unused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct OperandRanges {
  #[serde(default)] pub add_max: i64,
  #[serde(default)] pub sub_max: i64,
  #[serde(default)] pub mul_max: i64,
  #[serde(default)] pub div_max: i64,
}

impl OperandRanges {
  pub fn max_for(&self, op: Operation) -> i64 {
    match op {
      Operation::Add => self.add_max,
      Operation::Sub => self.sub_max,
      Operation::Mul => self.mul_max,
      Operation::Div => self.div_max,
    }
  }

  fn set_max(&mut self, op: Operation, max: i64) {
    match op {
      Operation::Add => self.add_max = max,
      Operation::Sub => self.sub_max = max,
      Operation::Mul => self.mul_max = max,
      Operation::Div => self.div_max = max,
    }
  }
}

/// Resolved configuration of one difficulty level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct LevelProfile {
  pub level: u32,
  #[serde(rename(deserialize = "ops"))]
  pub allowed_ops: Vec<Operation>,
  pub ranges: OperandRanges,
  #[serde(default)]
  pub target_weights: TargetWeights,
  #[serde(default)]
  pub patterns: Vec<Pattern>,
  #[serde(default)]
  pub expr_chance: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total_max: Option<i64>,
}

impl LevelProfile {
  fn validate(&self) -> Result<(), ConfigError> {
    let level = self.level;
    let invalid = |reason: String| Err(ConfigError::Invalid(format!("level {level}: {reason}")));

    if level == 0 {
      return invalid("levels start at 1".into());
    }
    if self.allowed_ops.is_empty() {
      return invalid("ops must not be empty".into());
    }
    for op in &self.allowed_ops {
      if self.ranges.max_for(*op) < 1 {
        return invalid(format!("operator {op:?} is enabled but its range is 0"));
      }
    }
    let r = &self.ranges;
    if [r.add_max, r.sub_max, r.mul_max, r.div_max].iter().any(|m| *m > OPERAND_MAX) {
      return invalid(format!("operand ranges must not exceed {OPERAND_MAX}"));
    }
    let w = &self.target_weights;
    if [w.result, w.a, w.b].iter().any(|x| !x.is_finite() || *x < 0.0) {
      return invalid("target weights must be non-negative".into());
    }
    if !(0.0..=1.0).contains(&self.expr_chance) {
      return invalid(format!("expr_chance {} outside [0, 1]", self.expr_chance));
    }
    if let Some(max) = self.total_max {
      if max < 0 {
        return invalid("total_max must be non-negative".into());
      }
    }
    for p in &self.patterns {
      if p.min_terms < 2 || p.min_terms > p.max_terms {
        return invalid(format!("pattern terms must satisfy 2 <= min <= max (got {}..{})", p.min_terms, p.max_terms));
      }
    }
    Ok(())
  }
}

/// Inclusive range of levels known to the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelBounds {
  pub min_level: u32,
  pub max_level: u32,
}

impl LevelBounds {
  pub fn clamp(&self, level: i64) -> u32 {
    level.clamp(i64::from(self.min_level), i64::from(self.max_level)) as u32
  }
}

/// Immutable, sorted, non-empty set of level profiles.
#[derive(Clone, Debug)]
pub struct LevelTable {
  profiles: Vec<LevelProfile>,
}

impl LevelTable {
  /// Validate and sort profiles. Fails on an empty table, duplicate levels or
  /// an invalid profile.
  pub fn new(mut profiles: Vec<LevelProfile>) -> Result<Self, ConfigError> {
    if profiles.is_empty() {
      return Err(ConfigError::Invalid("level table is empty".into()));
    }
    for p in &profiles {
      p.validate()?;
    }
    profiles.sort_by_key(|p| p.level);
    if let Some(dup) = profiles.windows(2).find(|w| w[0].level == w[1].level) {
      return Err(ConfigError::Invalid(format!("level {} defined twice", dup[0].level)));
    }
    Ok(Self { profiles })
  }

  pub fn profiles(&self) -> &[LevelProfile] {
    &self.profiles
  }

  pub fn bounds(&self) -> LevelBounds {
    LevelBounds {
      min_level: self.profiles.first().map_or(1, |p| p.level),
      max_level: self.profiles.last().map_or(1, |p| p.level),
    }
  }

  /// Profile for `level`. Out-of-range levels clamp to the nearest end of the
  /// table; a gap inside the table resolves to the closest level below.
  pub fn resolve(&self, level: i64) -> &LevelProfile {
    let clamped = self.bounds().clamp(level);
    let idx = self.profiles.partition_point(|p| p.level <= clamped);
    &self.profiles[idx.saturating_sub(1)]
  }

  /// Profile for `level` restricted to the operators of `mode`.
  ///
  /// Operators are intersected with the mode's set and patterns that could emit
  /// a forbidden operator are dropped. When nothing is left, the mode's
  /// operators are used with the ranges of the first level enabling them.
  pub fn resolve_for_mode(&self, level: i64, mode: GameMode) -> LevelProfile {
    let mut profile = self.resolve(level).clone();
    let Some(permitted) = mode.operations() else {
      return profile;
    };

    profile.allowed_ops.retain(|op| permitted.contains(op));
    profile
      .patterns
      .retain(|p| p.kind.operations().iter().all(|op| permitted.contains(op)));
    if profile.patterns.is_empty() {
      profile.expr_chance = 0.0;
    }

    if profile.allowed_ops.is_empty() {
      for op in permitted {
        let borrowed = self
          .profiles
          .iter()
          .find(|p| p.allowed_ops.contains(op))
          .map_or(0, |p| p.ranges.max_for(*op));
        if borrowed > 0 {
          profile.ranges.set_max(*op, borrowed);
          profile.allowed_ops.push(*op);
        }
      }
    }
    if profile.allowed_ops.is_empty() {
      // No level enables the mode's operators at all; serve the level unfiltered.
      return self.resolve(level).clone();
    }
    profile
  }
}
