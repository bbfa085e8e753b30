//! Error handling module for the bast CLI.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling throughout the application.

use thiserror::Error;

/// Main error type for the bast CLI application.
///
/// This enum represents all possible errors that can occur
/// during the execution of bast commands.
#[derive(Error, Debug)]
pub enum BastError {
    /// Error when a configuration file is malformed or fails shape validation.
    /// Commands report this as exit code 2.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when file operations fail.
    #[error("File operation failed: {0}")]
    FileOperation(String),

    /// Error when CLI argument validation fails.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error when a command execution fails for a reason other than
    /// program diagnostics (e.g. an unreadable root directory).
    #[error("Command execution failed: {0}")]
    CommandExecution(String),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error when JSON serialization/deserialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for any other cases.
    ///
    /// This variant is kept for backward compatibility and future extensibility.
    /// New specific error variants should be preferred over using this.
    #[allow(dead_code)]
    #[error("{0}")]
    Other(String),
}

impl BastError {
    /// Maps this error to the section 6 CLI exit code: malformed
    /// configuration is exit code 2, everything else handled here is a
    /// command failure unrelated to program diagnostics (exit code 1).
    pub fn exit_code(&self) -> i32 {
        match self {
            BastError::Config(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias using BastError.
pub type Result<T> = std::result::Result<T, BastError>;
