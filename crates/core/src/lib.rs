pub mod converter;
pub mod driver;
pub mod report;
pub mod testing;

pub use converter::{
    resolve, resolve_format, AudioAttributes, AudioFormat, ConverterConfig, Encoder,
    EncoderError, EncoderListener, EncodingAttributes, FfmpegEncoder, ProgressEvent, SourceInfo,
};
pub use driver::{ConversionDriver, ConversionRequest, ConversionSummary, DriverError};
pub use report::{ProgressReporter, SizeChange};
