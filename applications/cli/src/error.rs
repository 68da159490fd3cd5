/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] hearth_core::HearthError),

    #[error("Storage error: {0}")]
    Storage(#[from] hearth_storage::StorageError),
}
