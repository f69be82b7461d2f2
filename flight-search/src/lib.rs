//! # Flight Search
//!
//! Command-line front end for the flight search service. It reads its
//! settings from the environment, connects to an OpenSearch (or
//! Elasticsearch-compatible) cluster and runs one operation per invocation,
//! printing the result as JSON.
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`cli`]: Argument parsing and command execution

pub mod cli;
pub mod config;

pub use config::{Dependencies, Settings};

use flight_search_repository::SearchBackendError;
use thiserror::Error;

/// Errors that can occur during startup or while running a command.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid command-line input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Search backend error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchBackendError),

    /// Failed to render command output.
    #[error("Output error: {0}")]
    OutputError(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an output error.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::OutputError(msg.into())
    }
}
