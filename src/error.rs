//! Error handling for the shellforge application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for shellforge operations.
///
/// Every surfaced error carries a stable kind, a human-readable message and
/// enough structured detail (offending path, profile name, validation
/// messages) to diagnose the failure without digging into internals.
#[derive(Error, Debug)]
pub enum Error {
    /// The scaffold request itself is malformed (missing or invalid fields).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A configuration file exists but could not be read or parsed.
    #[error("Invalid configuration: {message} ({path})")]
    InvalidConfig { message: String, path: String },

    /// A rendered destination path escapes the project root. This aborts the
    /// whole generation step, it is never a per-file condition.
    #[error("Path escapes project directory: {path}")]
    PathEscape { path: String, project_root: String },

    /// Permission-denied conditions, kept distinct from other I/O failures
    /// so callers can tell "fix permissions" from "disk or path problem".
    #[error("Permission denied: {message} ({path})")]
    PermissionDenied { message: String, path: String },

    /// Any filesystem failure that is not a permission problem.
    #[error("Filesystem error: {message} ({path})")]
    Filesystem { message: String, path: String },

    /// The target project directory does not exist.
    #[error("Project directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// The requested profile is not in the registry.
    #[error("Profile not found: '{name}' (available: {})", .available.join(", "))]
    ProfileNotFound { name: String, available: Vec<String> },

    /// A template source file is missing or unreadable.
    #[error("Template error: {message}")]
    TemplateError { message: String },

    /// Template rendering failed.
    #[error("Render error: {message}")]
    RenderError { message: String },

    /// The merged configuration does not satisfy the profile's option schema.
    #[error("Invalid profile options: {message}")]
    InvalidOptions { message: String },

    /// The post-create hook exceeded its wall-clock bound. This is the one
    /// hook outcome promoted to a fatal error; every other hook failure
    /// degrades to an `ExecutionResult`.
    #[error("Post-create hook timed out after {timeout_secs}s: {hook}")]
    HookTimeout { hook: String, timeout_secs: u64 },

    /// Unrecoverable internal failures, e.g. an unreadable templates root.
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Untranslated I/O errors from the standard library.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Convenience type alias for Results with shellforge's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
