//! Error types for vsh.

use thiserror::Error;

/// Top-level result type for vsh operations.
pub type Result<T> = std::result::Result<T, VshError>;

/// Top-level error type for vsh.
#[derive(Debug, Error)]
pub enum VshError {
    #[error("vault error: {0}")]
    Vault(String),

    #[error("index error: {0}")]
    Index(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}
