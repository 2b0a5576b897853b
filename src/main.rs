//! Arithmetic practice backend
//!
//! - Axum HTTP API serving rounds of arithmetic tasks scaled to a level
//! - Answer evaluation, level progression and in-memory round statistics
//! - Static client fallback (STATIC_DIR, default ./static)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   LEVELS_CONFIG_PATH  : TOML level table replacing the built-in one
//!   STATIC_DIR          : directory of the browser client (default ./static)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod config;
mod domain;
mod entropy;
mod error;
mod evaluate;
mod levels;
mod progress;
mod protocol;
mod round;
mod routes;
mod state;
mod stats;
mod synth;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Level table is loaded once here and only read afterwards.
  let state = Arc::new(AppState::new()?);

  let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".into());
  let app = build_router(state, &static_dir);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "arith_backend", %addr, %static_dir, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "arith_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "arith_backend", "Shutdown signal received");
}
