//! Testing utilities and mock implementations.
//!
//! [`MockEncoder`] stands in for ffmpeg so the driver and reporter can be
//! exercised without any external binaries.
//!
//! # Example
//!
//! ```rust,ignore
//! use audio_converter_core::driver::{ConversionDriver, ConversionRequest};
//! use audio_converter_core::testing::MockEncoder;
//!
//! let encoder = MockEncoder::new();
//! encoder.set_output_size(512);
//!
//! let driver = ConversionDriver::new(encoder);
//! driver.convert(&ConversionRequest::new("in.wav", "out.mp3"), &mut out).await?;
//! ```

mod mock_encoder;

pub use mock_encoder::{MockEncoder, RecordedEncoding};
