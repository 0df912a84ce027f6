//! Converter module for transcoding audio files.
//!
//! This module provides the `Encoder` trait and an FFmpeg-backed
//! implementation, plus the lookup that turns an output extension into the
//! attributes handed to the encoder.
//!
//! # Example
//!
//! ```ignore
//! use audio_converter_core::converter::{
//!     resolve_format, AudioAttributes, Encoder, EncodingAttributes, FfmpegEncoder,
//! };
//!
//! let encoder = FfmpegEncoder::with_defaults();
//!
//! // Probe a media file
//! let info = encoder.probe(Path::new("/path/to/file.flac")).await?;
//! println!("Duration: {} ms", info.duration_ms);
//!
//! // Convert to OGG Vorbis
//! let format = resolve_format("ogg").format;
//! let attributes = EncodingAttributes::new(format, AudioAttributes::for_format(format));
//! encoder
//!     .encode(Path::new("in.flac"), Path::new("out.ogg"), &attributes, &mut listener)
//!     .await?;
//! ```

mod config;
mod error;
mod ffmpeg;
mod resolve;
mod traits;
mod types;

pub use config::ConverterConfig;
pub use error::EncoderError;
pub use ffmpeg::FfmpegEncoder;
pub use resolve::{
    output_extension, resolve, resolve_format, ResolvedFormat, DEFAULT_EXTENSION, FALLBACK_FORMAT,
};
pub use traits::{Encoder, EncoderListener};
pub use types::{
    AudioAttributes, AudioFormat, EncodingAttributes, ProgressEvent, SourceInfo,
    LOSSY_BIT_RATE_BPS, OUTPUT_CHANNELS, OUTPUT_SAMPLE_RATE_HZ,
};
