use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::builder::BuildError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Frame construction failed: {source}")]
    Build {
        #[from]
        source: BuildError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
