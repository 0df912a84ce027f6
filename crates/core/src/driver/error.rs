//! Error types for the conversion driver.

use std::path::PathBuf;
use thiserror::Error;

use crate::converter::EncoderError;

/// Errors that end a conversion.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Wrong number of command-line arguments.
    #[error("Expected 2 arguments (input and output file), got {count}")]
    Usage { count: usize },

    /// Input path does not exist.
    #[error("The input file '{}' does not exist.", path.display())]
    InputNotFound { path: PathBuf },

    /// Input path exists but is not a regular file.
    #[error("'{}' is not a valid file.", path.display())]
    NotAFile { path: PathBuf },

    /// The encoder reported a failure.
    #[error(transparent)]
    Encoding(#[from] EncoderError),

    /// Writing the report or reading file sizes failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Whether this error was raised before any encoding started.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Usage { .. } | Self::InputNotFound { .. } | Self::NotAFile { .. }
        )
    }
}
