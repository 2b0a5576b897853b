//! Loading the level table from TOML.
//!
//! The built-in table (`config/levels.toml`) is compiled into the binary.
//! `LEVELS_CONFIG_PATH` may point to a replacement file with the same schema;
//! see `LevelConfig` and `crate::levels::LevelProfile`.

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::levels::{LevelProfile, LevelTable};

/// Built-in level table.
pub const BUILTIN_LEVELS_TOML: &str = include_str!("../config/levels.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read level table {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse level table: {0}")]
  Parse(#[from] toml::de::Error),
  #[error("invalid level table: {0}")]
  Invalid(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct LevelConfig {
  pub levels: Vec<LevelProfile>,
}

/// Parse and validate a level table.
pub fn parse_level_table(src: &str) -> Result<LevelTable, ConfigError> {
  let cfg = toml::from_str::<LevelConfig>(src)?;
  LevelTable::new(cfg.levels)
}

pub fn builtin_level_table() -> Result<LevelTable, ConfigError> {
  parse_level_table(BUILTIN_LEVELS_TOML)
}

fn read_level_table(path: &str) -> Result<LevelTable, ConfigError> {
  let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
  parse_level_table(&src)
}

/// Load the table from LEVELS_CONFIG_PATH. A missing variable or any read,
/// parse or validation error falls back to the built-in table.
pub fn load_level_table_from_env() -> Result<LevelTable, ConfigError> {
  if let Ok(path) = std::env::var("LEVELS_CONFIG_PATH") {
    match read_level_table(&path) {
      Ok(table) => {
        info!(target: "config", %path, levels = table.profiles().len(), "Loaded level table (TOML)");
        return Ok(table);
      }
      Err(e) => {
        error!(target: "config", %path, error = %e, "Failed to load level table; using built-in levels");
      }
    }
  }
  builtin_level_table()
}
