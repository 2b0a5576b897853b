//! Domain models used by the backend: operations, tasks, rounds, outcomes and modes.

use serde::{Deserialize, Serialize};

/// Arithmetic operation of a binary task (and the +/- links of an expression).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
  Add,
  Sub,
  Mul,
  Div,
}

impl Operation {
  /// Apply the operation with integer division. `None` on overflow or a zero
  /// divisor; client-sent tasks can carry any `i64`.
  pub fn apply(self, a: i64, b: i64) -> Option<i64> {
    match self {
      Operation::Add => a.checked_add(b),
      Operation::Sub => a.checked_sub(b),
      Operation::Mul => a.checked_mul(b),
      Operation::Div => a.checked_div(b),
    }
  }

  pub fn token(self) -> OpToken {
    match self {
      Operation::Add => OpToken::Plus,
      Operation::Sub => OpToken::Minus,
      Operation::Mul => OpToken::Times,
      Operation::Div => OpToken::Divide,
    }
  }
}

/// Operator symbol inside an expression statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpToken {
  #[serde(rename = "+")]
  Plus,
  #[serde(rename = "-")]
  Minus,
  #[serde(rename = "×")]
  Times,
  #[serde(rename = "÷")]
  Divide,
  #[serde(rename = "=")]
  Equals,
}

impl OpToken {
  pub fn operation(self) -> Option<Operation> {
    match self {
      OpToken::Plus => Some(Operation::Add),
      OpToken::Minus => Some(Operation::Sub),
      OpToken::Times => Some(Operation::Mul),
      OpToken::Divide => Some(Operation::Div),
      OpToken::Equals => None,
    }
  }
}

/// One node of an expression statement such as `3 + 5 - 2 = ?`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExprNode {
  Number { value: i64 },
  Op { op: OpToken },
  Hole { id: String },
}

/// Legacy hidden-quantity marker of binary tasks, still read by older clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerTarget {
  Result,
  A,
  B,
}

/// Which quantity of a task is hidden.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerSpec {
  Result,
  Operand {
    #[serde(rename = "operandIndex")]
    operand_index: usize,
  },
}

impl From<AnswerTarget> for AnswerSpec {
  fn from(t: AnswerTarget) -> Self {
    match t {
      AnswerTarget::Result => AnswerSpec::Result,
      AnswerTarget::A => AnswerSpec::Operand { operand_index: 0 },
      AnswerTarget::B => AnswerSpec::Operand { operand_index: 1 },
    }
  }
}

/// `a op b = c` with exactly one of a, b, c hidden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryTask {
  pub id: String,
  pub a: i64,
  pub b: i64,
  pub op: Operation,
  pub correct_answer: i64,
  pub target: AnswerTarget,
  pub answer: AnswerSpec,
}

impl BinaryTask {
  pub fn result(&self) -> Option<i64> {
    self.op.apply(self.a, self.b)
  }

  fn is_consistent(&self) -> bool {
    if self.a < 0 || self.b < 0 {
      return false;
    }
    let exact = match self.op {
      Operation::Sub => self.a >= self.b,
      Operation::Div => self.b != 0 && self.a % self.b == 0,
      Operation::Add | Operation::Mul => true,
    };
    let hidden = match self.target {
      AnswerTarget::Result => self.result(),
      AnswerTarget::A => Some(self.a),
      AnswerTarget::B => Some(self.b),
    };
    exact && self.result().is_some() && hidden == Some(self.correct_answer) && AnswerSpec::from(self.target) == self.answer
  }
}

/// Multi-term statement evaluated strictly left to right, with a single hole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionTask {
  pub id: String,
  pub tokens: Vec<ExprNode>,
  pub correct_answer: i64,
  pub answer: AnswerSpec,
}

impl ExpressionTask {
  /// Does the statement hold when the hole is filled with `value`?
  ///
  /// Returns false for malformed statements (no hole, several holes, missing
  /// `=`, operators out of place) and for steps that overflow or divide by zero.
  pub fn holds_with(&self, value: i64) -> bool {
    let holes = self.tokens.iter().filter(|n| matches!(n, ExprNode::Hole { .. })).count();
    if holes != 1 {
      return false;
    }
    let Some(eq) = self.tokens.iter().position(|n| matches!(n, ExprNode::Op { op: OpToken::Equals })) else {
      return false;
    };
    let resolve = |node: &ExprNode| match node {
      ExprNode::Number { value } => Some(*value),
      ExprNode::Hole { .. } => Some(value),
      ExprNode::Op { .. } => None,
    };

    let (lhs, rhs) = (&self.tokens[..eq], &self.tokens[eq + 1..]);
    let [rhs_node] = rhs else { return false };
    let Some(expected) = resolve(rhs_node) else { return false };

    let Some((first, rest)) = lhs.split_first() else { return false };
    let Some(mut running) = resolve(first) else { return false };
    for pair in rest.chunks(2) {
      let [ExprNode::Op { op }, operand] = pair else { return false };
      let (Some(operation), Some(operand)) = (op.operation(), resolve(operand)) else { return false };
      let Some(next) = operation.apply(running, operand) else { return false };
      running = next;
    }
    running == expected
  }
}

/// A single arithmetic question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Task {
  Binary(BinaryTask),
  Expression(ExpressionTask),
}

impl Task {
  pub fn id(&self) -> &str {
    match self {
      Task::Binary(t) => &t.id,
      Task::Expression(t) => &t.id,
    }
  }

  pub fn correct_answer(&self) -> i64 {
    match self {
      Task::Binary(t) => t.correct_answer,
      Task::Expression(t) => t.correct_answer,
    }
  }

  pub fn kind_label(&self) -> &'static str {
    match self {
      Task::Binary(_) => "binary",
      Task::Expression(_) => "expression",
    }
  }

  /// Structural check used on client-supplied tasks before scoring them.
  pub fn is_consistent(&self) -> bool {
    match self {
      Task::Binary(t) => t.is_consistent(),
      Task::Expression(t) => t.holds_with(t.correct_answer),
    }
  }
}

/// Ordered batch of tasks presented as one session.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
  pub round_id: String,
  pub tasks: Vec<Task>,
}

/// Tally of a completed round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
  pub correct: u32,
  pub total: u32,
}

impl RoundOutcome {
  /// correct / total, or 0 for an empty round.
  pub fn accuracy(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      f64::from(self.correct) / f64::from(self.total)
    }
  }
}

/// Operator-restriction filter applied on top of a level's profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameMode {
  #[default]
  Mixed,
  Add,
  Sub,
  Mul,
}

impl GameMode {
  /// Case-insensitive parse; anything unknown is `Mixed`.
  pub fn parse_lenient(s: &str) -> Self {
    match s.trim().to_ascii_lowercase().as_str() {
      "add" => GameMode::Add,
      "sub" => GameMode::Sub,
      "mul" => GameMode::Mul,
      _ => GameMode::Mixed,
    }
  }

  /// Operators permitted by the mode; `None` means no restriction.
  pub fn operations(self) -> Option<&'static [Operation]> {
    match self {
      GameMode::Mixed => None,
      GameMode::Add => Some(&[Operation::Add]),
      GameMode::Sub => Some(&[Operation::Sub]),
      GameMode::Mul => Some(&[Operation::Mul]),
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      GameMode::Mixed => "mixed",
      GameMode::Add => "add",
      GameMode::Sub => "sub",
      GameMode::Mul => "mul",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn num(value: i64) -> ExprNode {
    ExprNode::Number { value }
  }
  fn op(op: OpToken) -> ExprNode {
    ExprNode::Op { op }
  }
  fn hole() -> ExprNode {
    ExprNode::Hole { id: "h".into() }
  }

  #[test]
  fn expression_is_evaluated_left_to_right() {
    // 2 + 3 × 4 = 20 without precedence
    let task = ExpressionTask {
      id: "t".into(),
      tokens: vec![num(2), op(OpToken::Plus), num(3), op(OpToken::Times), num(4), op(OpToken::Equals), hole()],
      correct_answer: 20,
      answer: AnswerSpec::Result,
    };
    assert!(task.holds_with(20));
    assert!(!task.holds_with(14));
  }

  #[test]
  fn expression_with_operand_hole() {
    let task = ExpressionTask {
      id: "t".into(),
      tokens: vec![num(7), op(OpToken::Minus), hole(), op(OpToken::Equals), num(4)],
      correct_answer: 3,
      answer: AnswerSpec::Operand { operand_index: 1 },
    };
    assert!(Task::Expression(task).is_consistent());
  }

  #[test]
  fn malformed_expressions_never_hold() {
    let two_holes = ExpressionTask {
      id: "t".into(),
      tokens: vec![hole(), op(OpToken::Plus), num(1), op(OpToken::Equals), hole()],
      correct_answer: 1,
      answer: AnswerSpec::Result,
    };
    assert!(!two_holes.holds_with(1));

    let no_equals = ExpressionTask {
      id: "t".into(),
      tokens: vec![num(1), op(OpToken::Plus), hole()],
      correct_answer: 1,
      answer: AnswerSpec::Result,
    };
    assert!(!no_equals.holds_with(1));
  }

  #[test]
  fn overflowing_steps_are_inconsistent() {
    let min_div = ExpressionTask {
      id: "t".into(),
      tokens: vec![num(i64::MIN), op(OpToken::Divide), num(-1), op(OpToken::Equals), hole()],
      correct_answer: 0,
      answer: AnswerSpec::Result,
    };
    assert!(!Task::Expression(min_div).is_consistent());

    let by_zero = ExpressionTask {
      id: "t".into(),
      tokens: vec![num(6), op(OpToken::Divide), num(0), op(OpToken::Equals), hole()],
      correct_answer: 0,
      answer: AnswerSpec::Result,
    };
    assert!(!by_zero.holds_with(0));

    let mut big = BinaryTask {
      id: "t".into(),
      a: i64::MAX,
      b: 1,
      op: Operation::Add,
      correct_answer: i64::MIN,
      target: AnswerTarget::Result,
      answer: AnswerSpec::Result,
    };
    assert!(!Task::Binary(big.clone()).is_consistent());
    big.op = Operation::Mul;
    big.b = 2;
    big.target = AnswerTarget::A;
    big.answer = AnswerSpec::Operand { operand_index: 0 };
    big.correct_answer = i64::MAX;
    assert!(!Task::Binary(big).is_consistent());
    assert_eq!(Operation::Sub.apply(i64::MIN, 1), None);
  }

  #[test]
  fn binary_consistency_checks_hidden_value() {
    let mut task = BinaryTask {
      id: "t".into(),
      a: 12,
      b: 4,
      op: Operation::Div,
      correct_answer: 3,
      target: AnswerTarget::Result,
      answer: AnswerSpec::Result,
    };
    assert!(Task::Binary(task.clone()).is_consistent());
    task.correct_answer = 4;
    assert!(!Task::Binary(task.clone()).is_consistent());
    task.target = AnswerTarget::B;
    task.answer = AnswerSpec::Operand { operand_index: 1 };
    assert!(Task::Binary(task).is_consistent());
  }

  #[test]
  fn task_serializes_with_kind_tag() {
    let task = Task::Binary(BinaryTask {
      id: "x".into(),
      a: 2,
      b: 3,
      op: Operation::Add,
      correct_answer: 5,
      target: AnswerTarget::Result,
      answer: AnswerSpec::Result,
    });
    let v = serde_json::to_value(&task).unwrap();
    assert_eq!(v["kind"], "binary");
    assert_eq!(v["op"], "add");
    assert_eq!(v["correctAnswer"], 5);
    assert_eq!(v["answer"]["kind"], "result");

    let back: Task = serde_json::from_value(v).unwrap();
    assert_eq!(back, task);
  }

  #[test]
  fn expression_nodes_use_symbols() {
    let v = serde_json::to_value(op(OpToken::Times)).unwrap();
    assert_eq!(v, serde_json::json!({ "type": "op", "op": "×" }));
    let v = serde_json::to_value(AnswerSpec::Operand { operand_index: 2 }).unwrap();
    assert_eq!(v, serde_json::json!({ "kind": "operand", "operandIndex": 2 }));
  }

  #[test]
  fn accuracy_of_empty_round_is_zero() {
    assert_eq!(RoundOutcome { correct: 0, total: 0 }.accuracy(), 0.0);
    assert_eq!(RoundOutcome { correct: 3, total: 4 }.accuracy(), 0.75);
  }

  #[test]
  fn unknown_modes_fall_back_to_mixed() {
    assert_eq!(GameMode::parse_lenient("ADD"), GameMode::Add);
    assert_eq!(GameMode::parse_lenient("div"), GameMode::Mixed);
    assert_eq!(GameMode::parse_lenient(""), GameMode::Mixed);
  }
}
