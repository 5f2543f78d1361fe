//! Error handling for the postgen hook.
//! Defines the error types and results used outside of the per-path cleanup loop.

use std::io;
use thiserror::Error;

/// Custom error types for postgen operations.
///
/// Errors from this enum only occur before the cleanup loop starts: reading the
/// hook payload, loading cleanup rules, or evaluating rule templates. Failures to
/// remove a single path are reported through [`crate::cleanup::RemovalError`] and
/// never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during template rendering
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Represents errors raised by the MiniJinja engine
    #[error("Template error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents errors that occur during rule file parsing or processing
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents errors in the payload passed by the scaffolding tool
    #[error("Hook payload error: {0}")]
    HookError(String),

    /// Represents an unusable target path
    #[error("Path error: {0}")]
    PathError(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
