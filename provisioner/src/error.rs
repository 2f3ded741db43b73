//! Provisioner-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("{description} failed after {attempts} attempt(s): {detail}")]
    CommandFailed {
        description: String,
        attempts: u32,
        detail: String,
    },

    #[error("Failed to spawn {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("File system operation failed: {operation} on {path}")]
    FileSystemError { operation: String, path: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ProvisionError {
    pub fn config(field: impl Into<String>) -> Self {
        ProvisionError::ConfigurationError { field: field.into() }
    }

    pub fn file_system(operation: impl Into<String>, path: impl AsRef<std::path::Path>) -> Self {
        ProvisionError::FileSystemError {
            operation: operation.into(),
            path: path.as_ref().display().to_string(),
        }
    }
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;
