//! HTTP endpoint handlers. These are thin wrappers that validate input and
//! forward to the core. Each handler is instrumented and logs parameters and
//! basic result info.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::domain::{RoundOutcome, Task};
use crate::error::ApiError;
use crate::evaluate::evaluate;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_levels(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(LevelsOut {
    bounds: state.levels.bounds(),
    profiles: state.levels.profiles().to_vec(),
  })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_round(
  State(state): State<Arc<AppState>>,
  Query(q): Query<RoundQuery>,
) -> Result<impl IntoResponse, ApiError> {
  let req = q.validate()?;
  let round = state.new_round(&req);
  let expressions = round.tasks.iter().filter(|t| matches!(t, Task::Expression(_))).count();
  info!(
    target: "round",
    level = req.level,
    mode = req.mode.as_str(),
    length = round.tasks.len(),
    expressions,
    seeded = req.seed.is_some(),
    round_id = %round.round_id,
    "Round started"
  );
  Ok(Json(round))
}

#[instrument(level = "info", skip(payload))]
pub async fn http_post_answer(payload: Result<Json<AnswerIn>, JsonRejection>) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = payload?;
  if !body.task.is_consistent() {
    return Err(ApiError::InconsistentTask);
  }
  let verdict = evaluate(&body.task, &body.answer);
  info!(
    target: "answer",
    task_id = %body.task.id(),
    kind = body.task.kind_label(),
    answer_len = body.answer.len(),
    ?verdict,
    "Answer evaluated"
  );
  Ok(Json(AnswerOut {
    verdict,
    correct: verdict.is_scored().then(|| verdict.is_correct()),
    correct_answer: body.task.correct_answer(),
  }))
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_outcome(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<OutcomeIn>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = payload?;
  if body.total == 0 {
    return Err(ApiError::InvalidOutcome("total must be at least 1".into()));
  }
  if body.correct > body.total {
    return Err(ApiError::InvalidOutcome(format!("correct ({}) exceeds total ({})", body.correct, body.total)));
  }
  let outcome = RoundOutcome { correct: body.correct, total: body.total };
  let (next_level, level_stats) = state.record_outcome(body.level, outcome).await;
  info!(target: "outcome", level = body.level, correct = body.correct, total = body.total, next_level, "Round completed");
  Ok(Json(OutcomeOut { accuracy: outcome.accuracy(), next_level, level_stats }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.stats_snapshot().await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  state.clear_stats().await;
  info!(target: "outcome", "Statistics cleared");
  StatusCode::NO_CONTENT
}
