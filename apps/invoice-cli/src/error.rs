//! # CLI Error Type
//!
//! Unified error type for `garage-invoice` commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in garage-invoice                         │
//! │                                                                         │
//! │  read input ─── io::Error ─────────────┐                               │
//! │       │                                │                               │
//! │       ▼                                ▼                               │
//! │  parse JSON ─── serde_json::Error ──► CliError ──► stderr, exit code   │
//! │       │                                ▲                               │
//! │       ▼                                │                               │
//! │  garage-core ── CoreError ─────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use garage_core::{AmountError, CoreError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not read {path}: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("could not encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<AmountError> for CliError {
    fn from(err: AmountError) -> Self {
        CliError::Core(CoreError::from(err))
    }
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// | Code | Meaning                          |
    /// |------|----------------------------------|
    /// | 2    | bad input (data or arguments)    |
    /// | 3    | bad configuration                |
    /// | 1    | I/O failure                      |
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Core(_) | CliError::Json { .. } => 2,
            CliError::Config(_) => 3,
            CliError::Input { .. } | CliError::Output(_) | CliError::Encode(_) => 1,
        }
    }
}
