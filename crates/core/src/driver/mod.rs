//! Conversion driver.
//!
//! Validates the request, resolves the output format, runs the encoder with a
//! [`ProgressReporter`](crate::report::ProgressReporter) attached and prints
//! the final summary. Errors are returned, never turned into a process exit.
//!
//! # Example
//!
//! ```ignore
//! use audio_converter_core::converter::FfmpegEncoder;
//! use audio_converter_core::driver::{ConversionDriver, ConversionRequest};
//!
//! let driver = ConversionDriver::new(FfmpegEncoder::with_defaults());
//! let request = ConversionRequest::new("input.wav", "output.mp3");
//! let summary = driver.convert(&request, &mut std::io::stdout()).await?;
//! println!("{} -> {} bytes", summary.input_size, summary.output_size);
//! ```

mod error;
mod runner;
mod types;

pub use error::DriverError;
pub use runner::ConversionDriver;
pub use types::{ConversionRequest, ConversionSummary};
