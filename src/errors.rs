//! Centralized error handling.
//!
//! Provides a unified error type for every workflow. Each variant maps to a
//! fail-fast abort; the upgrader's seeding step is the only caller that
//! downgrades an error to a warning.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // External tools
    #[error("Required tool '{0}' is not available")]
    ToolNotFound(String),

    #[error("'{program}' exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    // Filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Database
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // Validation
    #[error("{0}")]
    Validation(String),
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn command_failed(
        program: impl Into<String>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        let status = match code {
            Some(c) => format!("status {}", c),
            None => "signal".to_string(),
        };
        AppError::CommandFailed {
            program: program.into(),
            status,
            stderr: stderr.into().trim().to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}
