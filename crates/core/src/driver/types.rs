//! Types for the conversion driver.

use std::path::PathBuf;
use std::time::Duration;

use super::error::DriverError;
use crate::converter::AudioFormat;
use crate::report::SizeChange;

/// One conversion, as requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// File to read.
    pub input_path: PathBuf,
    /// File to write.
    pub output_path: PathBuf,
}

impl ConversionRequest {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Builds a request from positional arguments (program name excluded).
    pub fn from_args<I, S>(args: I) -> Result<Self, DriverError>
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        let mut args: Vec<PathBuf> = args.into_iter().map(Into::into).collect();
        if args.len() != 2 {
            return Err(DriverError::Usage { count: args.len() });
        }
        let output_path = args.remove(1);
        let input_path = args.remove(0);
        Ok(Self {
            input_path,
            output_path,
        })
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    /// Format that was produced.
    pub format: AudioFormat,
    /// Wall-clock time spent in the encoder.
    pub elapsed: Duration,
    /// Input file size in bytes.
    pub input_size: u64,
    /// Output file size in bytes.
    pub output_size: u64,
    /// Size comparison, `None` when the input is empty.
    pub size_change: Option<SizeChange>,
}
