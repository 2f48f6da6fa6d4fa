//! # Error Handling
//!
//! This module defines the error type shared by every operation in
//! `pr-mirror`. It uses `thiserror` to derive display messages so that the
//! binary can print any failure without knowing where it came from.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of every failure an invocation can surface.
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The taxonomy is deliberately small:
//!
//! - `Usage`: a required input is missing or invalid. The binary prints the
//!   message together with the usage text.
//! - `CommandFailed`: a subprocess could not be started or exited non-zero.
//!   For sensitive invocations every field that could carry a credential holds
//!   [`REDACTED`](crate::shell::REDACTED) instead.
//! - `Workspace`: the `mirror-repo` directory could not be removed.
//! - `Prompt`: the verify confirmation could not read or write the terminal.
//!
//! Declining the verify prompt is not an error; see
//! [`Outcome::Declined`](crate::orchestrator::Outcome::Declined).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for pr-mirror operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required input was missing or invalid.
    #[error("{message}")]
    Usage { message: String },

    /// A subprocess failed to start or exited with a non-zero status.
    ///
    /// `stdout` and `stderr` are only rendered when they captured text.
    #[error(
        "Command failed: {command}\n{reason}{}{}",
        section("stdout", stdout),
        section("stderr", stderr)
    )]
    CommandFailed {
        command: String,
        reason: String,
        stdout: Option<String>,
        stderr: Option<String>,
    },

    /// The workspace directory could not be removed.
    #[error("Failed to clean workspace {}: {source}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The verify prompt could not talk to the terminal.
    #[error("Confirmation prompt failed: {source}")]
    Prompt {
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Usage`].
    pub fn usage(message: impl Into<String>) -> Self {
        Error::Usage {
            message: message.into(),
        }
    }

    /// Whether this error should be reported together with the usage text.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage { .. })
    }
}

fn section(label: &str, text: &Option<String>) -> String {
    match text.as_deref() {
        Some(text) if !text.is_empty() => format!("\n{}:\n{}", label, text),
        _ => String::new(),
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
