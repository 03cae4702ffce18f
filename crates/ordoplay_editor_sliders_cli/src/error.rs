// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors of the headless host.

use ordoplay_editor_sliders::{ConfigError, SliderError};
use thiserror::Error;

/// Errors that stop a run
#[derive(Debug, Error)]
pub enum CliError {
    /// File system error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read or written
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Malformed scene or script
    #[error("Parse error in {path}: {source}")]
    Parse {
        /// File being parsed
        path: String,
        /// Underlying error
        source: ron::error::SpannedError,
    },

    /// Scene could not be written
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Report could not be written as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Slider configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Slider tool refused a command
    #[error(transparent)]
    Slider(#[from] SliderError),

    /// Script references something the scene does not contain
    #[error("Script error: {0}")]
    Script(String),

    /// Scene references something it does not contain
    #[error("Invalid scene: {0}")]
    Scene(String),
}

/// Result type for the host
pub type Result<T> = std::result::Result<T, CliError>;
