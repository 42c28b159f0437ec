//! Error types for the pbip-theme crate.
//!
//! Only the plumbing around the transform can fail. Coercion and projection
//! never return errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a report or writing theme files.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The report document is not valid JSON or does not have the report shape.
    #[error("invalid report document: {0}")]
    Report(#[source] serde_json::Error),

    /// Rendering an output document failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ThemeError {
    /// Create an I/O error tagged with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pbip-theme operations.
pub type Result<T> = std::result::Result<T, ThemeError>;
