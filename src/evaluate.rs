//! Answer evaluation: exact integer match against the task's hidden value.

use serde::Serialize;

use crate::domain::Task;
use crate::util::parse_integral;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  /// Empty or whitespace input. Not scored at all.
  Unanswered,
  Correct,
  Incorrect,
}

impl Verdict {
  pub fn is_scored(self) -> bool {
    self != Verdict::Unanswered
  }

  pub fn is_correct(self) -> bool {
    self == Verdict::Correct
  }
}

/// Score `raw` against `task`. Non-numeric input is incorrect, never an error.
pub fn evaluate(task: &Task, raw: &str) -> Verdict {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Verdict::Unanswered;
  }
  match parse_integral(trimmed) {
    Some(v) if v == task.correct_answer() => Verdict::Correct,
    _ => Verdict::Incorrect,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::builtin_level_table;
  use crate::domain::GameMode;
  use crate::entropy::round_rng;
  use crate::round::generate_round;

  #[test]
  fn own_answer_is_always_correct() {
    let table = builtin_level_table().unwrap();
    let mut rng = round_rng(Some(21));
    for level in 1..=6 {
      let round = generate_round(&table, level, 50, GameMode::Mixed, &mut rng);
      for task in &round.tasks {
        assert_eq!(evaluate(task, &task.correct_answer().to_string()), Verdict::Correct);
        assert_eq!(evaluate(task, &format!("  {} \n", task.correct_answer())), Verdict::Correct);
        assert_eq!(evaluate(task, &(task.correct_answer() + 1).to_string()), Verdict::Incorrect);
      }
    }
  }

  #[test]
  fn blank_input_is_unanswered() {
    let table = builtin_level_table().unwrap();
    let round = generate_round(&table, 2, 1, GameMode::Mixed, &mut round_rng(Some(1)));
    let task = &round.tasks[0];
    for raw in ["", "   ", "\t\n"] {
      let v = evaluate(task, raw);
      assert_eq!(v, Verdict::Unanswered);
      assert!(!v.is_scored());
      assert!(!v.is_correct());
    }
  }

  #[test]
  fn garbage_is_incorrect() {
    let table = builtin_level_table().unwrap();
    let round = generate_round(&table, 3, 1, GameMode::Mixed, &mut round_rng(Some(2)));
    let task = &round.tasks[0];
    for raw in ["abc", "1 2", "5a", "--3"] {
      let v = evaluate(task, raw);
      assert_eq!(v, Verdict::Incorrect);
      assert!(v.is_scored());
    }
  }

  #[test]
  fn integral_decimal_counts() {
    let table = builtin_level_table().unwrap();
    let round = generate_round(&table, 1, 1, GameMode::Mixed, &mut round_rng(Some(3)));
    let task = &round.tasks[0];
    assert_eq!(evaluate(task, &format!("{}.0", task.correct_answer())), Verdict::Correct);
    assert_eq!(evaluate(task, &format!("{}.5", task.correct_answer())), Verdict::Incorrect);
  }
}
