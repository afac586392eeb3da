// arena/src/core/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Invalid spawn setup: {0}")]
    InvalidSpawnPoints(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type ArenaResult<T> = Result<T, ArenaError>;
