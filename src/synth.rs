//! Task synthesis: two-operand tasks and multi-term expressions.
//!
//! Flow for one task:
//! 1) If the profile has patterns, roll `expr_chance` to attempt an expression.
//! 2) An expression attempt draws terms and +/- links, evaluates them left to
//!    right and is rejected when it breaks the level's constraints. After
//!    `MAX_EXPR_ATTEMPTS` rejections we fall back to step 3.
//! 3) Two-operand synthesis with operator-specific operand rules, then the
//!    hidden quantity is drawn from the target weights.
//!
//! Rejected attempts are discarded, never patched.

use tracing::debug;
use uuid::Uuid;

use crate::domain::{AnswerSpec, AnswerTarget, BinaryTask, ExprNode, ExpressionTask, OpToken, Operation, Task};
use crate::entropy::Entropy;
use crate::levels::{HolePolicy, LevelProfile, Pattern, PatternKind};

/// Upper bound for a single expression term.
pub const EXPR_TERM_CEILING: i64 = 20;
/// Levels up to this one never show a negative running total.
pub const NON_NEGATIVE_LEVEL_MAX: u32 = 3;
/// Hard cap on expression attempts before falling back to a binary task.
pub const MAX_EXPR_ATTEMPTS: usize = 24;
/// Id of the single hole in an expression. Fixed so seeded rounds repeat.
pub const HOLE_ID: &str = "hole";
/// Probability of `+` between terms of a sumdiff/mixed pattern.
const ADD_LINK_PROBABILITY: f64 = 0.7;

/// Build one task for `profile`.
pub fn synthesize<E: Entropy + ?Sized>(profile: &LevelProfile, rng: &mut E) -> Task {
  if !profile.patterns.is_empty() && rng.chance(profile.expr_chance) {
    if let Some(task) = synthesize_expression(profile, rng) {
      return Task::Expression(task);
    }
    debug!(target: "round", level = profile.level, attempts = MAX_EXPR_ATTEMPTS, "Expression attempts exhausted; using a two-operand task");
  }
  Task::Binary(synthesize_binary(profile, rng))
}

/// Two-operand task `a op b = c` honoring the operator's range.
pub fn synthesize_binary<E: Entropy + ?Sized>(profile: &LevelProfile, rng: &mut E) -> BinaryTask {
  let ops = &profile.allowed_ops;
  let op = ops.get(rng.next_index(ops.len())).copied().unwrap_or(Operation::Add);
  let max = profile.ranges.max_for(op).max(0);

  let (a, b) = match op {
    Operation::Add | Operation::Mul => (rng.next_int(0, max), rng.next_int(0, max)),
    Operation::Sub => {
      let a = rng.next_int(0, max);
      (a, rng.next_int(0, a))
    }
    Operation::Div => {
      let divisor = rng.next_int(1, max.max(1));
      let quotient = rng.next_int(0, max);
      (divisor * quotient, divisor)
    }
  };

  let target = profile.target_weights.pick(rng.next_float());
  let correct_answer = match target {
    // Ranges are capped at OPERAND_MAX, so the product always fits.
    AnswerTarget::Result => op.apply(a, b).unwrap_or_default(),
    AnswerTarget::A => a,
    AnswerTarget::B => b,
  };

  BinaryTask {
    id: Uuid::new_v4().to_string(),
    a,
    b,
    op,
    correct_answer,
    target,
    answer: target.into(),
  }
}

/// Expression with a single hole, or `None` once every attempt was rejected.
fn synthesize_expression<E: Entropy + ?Sized>(profile: &LevelProfile, rng: &mut E) -> Option<ExpressionTask> {
  let cap = expression_term_cap(profile);
  let forbid_negative = profile.level <= NON_NEGATIVE_LEVEL_MAX;

  for _ in 0..MAX_EXPR_ATTEMPTS {
    let pattern = &profile.patterns[rng.next_index(profile.patterns.len())];
    let min_terms = i64::from(pattern.min_terms.max(2));
    let max_terms = i64::from(pattern.max_terms).max(min_terms);
    let count = rng.next_int(min_terms, max_terms) as usize;

    let mut terms = Vec::with_capacity(count);
    let mut links = Vec::with_capacity(count - 1);
    terms.push(rng.next_int(0, cap));
    for _ in 1..count {
      links.push(draw_link(pattern.kind, rng));
      terms.push(rng.next_int(0, cap));
    }

    let Some(total) = evaluate_left_to_right(&terms, &links, forbid_negative) else {
      continue;
    };
    if total < 0 || profile.total_max.is_some_and(|max| total > max) {
      continue;
    }
    return Some(place_hole(pattern, &terms, &links, total, rng));
  }
  None
}

fn expression_term_cap(profile: &LevelProfile) -> i64 {
  match profile.ranges.add_max {
    m if m > 0 => m.min(EXPR_TERM_CEILING),
    _ => EXPR_TERM_CEILING,
  }
}

fn draw_link<E: Entropy + ?Sized>(kind: PatternKind, rng: &mut E) -> Operation {
  match kind {
    PatternKind::Sum => Operation::Add,
    PatternKind::Sumdiff | PatternKind::Mixed => {
      if rng.chance(ADD_LINK_PROBABILITY) { Operation::Add } else { Operation::Sub }
    }
  }
}

/// Running total of `terms` joined by `links`. `None` if `forbid_negative` and
/// any intermediate total drops below zero.
fn evaluate_left_to_right(terms: &[i64], links: &[Operation], forbid_negative: bool) -> Option<i64> {
  let (first, rest) = terms.split_first()?;
  let mut running = *first;
  for (link, term) in links.iter().zip(rest) {
    running = link.apply(running, *term)?;
    if forbid_negative && running < 0 {
      return None;
    }
  }
  Some(running)
}

fn place_hole<E: Entropy + ?Sized>(
  pattern: &Pattern,
  terms: &[i64],
  links: &[Operation],
  total: i64,
  rng: &mut E,
) -> ExpressionTask {
  let hole_at = match pattern.holes {
    HolePolicy::ResultOnly => None,
    HolePolicy::OneOperand => Some(rng.next_index(terms.len())),
    HolePolicy::ResultOrOneOperand => {
      if rng.chance(0.5) { None } else { Some(rng.next_index(terms.len())) }
    }
  };
  let hole = || ExprNode::Hole { id: HOLE_ID.into() };

  let mut tokens = Vec::with_capacity(terms.len() * 2 + 1);
  for (i, term) in terms.iter().enumerate() {
    if i > 0 {
      tokens.push(ExprNode::Op { op: links[i - 1].token() });
    }
    tokens.push(if hole_at == Some(i) { hole() } else { ExprNode::Number { value: *term } });
  }
  tokens.push(ExprNode::Op { op: OpToken::Equals });

  let (correct_answer, answer) = match hole_at {
    Some(i) => {
      tokens.push(ExprNode::Number { value: total });
      (terms[i], AnswerSpec::Operand { operand_index: i })
    }
    None => {
      tokens.push(hole());
      (total, AnswerSpec::Result)
    }
  };

  ExpressionTask {
    id: Uuid::new_v4().to_string(),
    tokens,
    correct_answer,
    answer,
  }
}
