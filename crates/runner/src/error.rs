//! Runner errors

use liqwatch_engine::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid monitor settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),

    #[error("Worker for shard {0} is gone")]
    WorkerGone(usize),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
