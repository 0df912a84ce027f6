//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while probing or encoding.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// Encoding process failed.
    #[error("Encoding failed: {reason}")]
    EncodingFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Failed to probe media file.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// Failed to parse FFprobe output.
    #[error("Failed to parse media info: {reason}")]
    ParseError { reason: String },

    /// I/O error during encoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncoderError {
    /// Creates a new encoding failed error with stderr output.
    pub fn encoding_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::EncodingFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new probe failed error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    /// Encoder diagnostics captured alongside the error, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::EncodingFailed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_failed_keeps_stderr() {
        let err = EncoderError::encoding_failed("exit code 1", Some("bad codec".to_string()));
        assert_eq!(err.to_string(), "Encoding failed: exit code 1");
        assert_eq!(err.stderr(), Some("bad codec"));
    }

    #[test]
    fn test_probe_failed_has_no_stderr() {
        let err = EncoderError::probe_failed("no streams");
        assert!(err.stderr().is_none());
        assert!(err.to_string().contains("no streams"));
    }
}
