//! Types for the converter module.

use serde::{Deserialize, Serialize};

/// Channel count forced onto every conversion.
pub const OUTPUT_CHANNELS: u8 = 2;

/// Sample rate forced onto every conversion.
pub const OUTPUT_SAMPLE_RATE_HZ: u32 = 44_100;

/// Bitrate used for every lossy output format.
pub const LOSSY_BIT_RATE_BPS: u32 = 128_000;

/// Output audio format, selected from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// MPEG Audio Layer III (LAME)
    Mp3,
    /// WAVE, 16-bit little-endian PCM (uncompressed)
    Wav,
    /// Ogg Vorbis
    Ogg,
    /// Advanced Audio Coding (raw ADTS stream)
    Aac,
    /// Free Lossless Audio Codec (lossless)
    Flac,
    /// Windows Media Audio 2
    Wma,
}

impl AudioFormat {
    /// Every recognised output format.
    pub const ALL: [AudioFormat; 6] = [
        Self::Mp3,
        Self::Wav,
        Self::Ogg,
        Self::Aac,
        Self::Flac,
        Self::Wma,
    ];

    /// Looks up a format by file extension (case-insensitive, exact match).
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wma => "wma",
        }
    }

    /// Returns the ffmpeg codec name for this format.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::Wav => "pcm_s16le",
            Self::Ogg => "libvorbis",
            Self::Aac => "aac",
            Self::Flac => "flac",
            Self::Wma => "wmav2",
        }
    }

    /// Returns the ffmpeg muxer (`-f`) name for this format.
    pub fn ffmpeg_muxer(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Aac => "adts",
            Self::Flac => "flac",
            Self::Wma => "asf",
        }
    }

    /// Target bitrate, `None` for uncompressed and lossless formats.
    pub fn bit_rate_bps(&self) -> Option<u32> {
        if self.is_lossless() {
            None
        } else {
            Some(LOSSY_BIT_RATE_BPS)
        }
    }

    /// Whether this format is lossless.
    pub fn is_lossless(&self) -> bool {
        matches!(self, Self::Wav | Self::Flac)
    }
}

/// Audio stream attributes handed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttributes {
    /// Encoder codec name (e.g. `libmp3lame`).
    pub codec: String,
    /// Target bitrate in bits per second (lossy formats only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate_bps: Option<u32>,
    /// Number of output channels.
    pub channels: u8,
    /// Output sample rate in Hz.
    pub sample_rate_hz: u32,
}

impl AudioAttributes {
    /// Builds the fixed attribute set for a format.
    pub fn for_format(format: AudioFormat) -> Self {
        Self {
            codec: format.ffmpeg_codec().to_string(),
            bit_rate_bps: format.bit_rate_bps(),
            channels: OUTPUT_CHANNELS,
            sample_rate_hz: OUTPUT_SAMPLE_RATE_HZ,
        }
    }
}

/// Complete encoding request: output container plus audio attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingAttributes {
    /// Output container (ffmpeg muxer name).
    pub output_format: String,
    /// Audio stream attributes.
    pub audio: AudioAttributes,
}

impl EncodingAttributes {
    pub fn new(format: AudioFormat, audio: AudioAttributes) -> Self {
        Self {
            output_format: format.ffmpeg_muxer().to_string(),
            audio,
        }
    }
}

/// Metadata about the source file, as reported by the encoder's probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Duration in milliseconds (0 when unknown).
    pub duration_ms: i64,
    /// Container format (e.g. "flac", "wav").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Audio codec of the first audio stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Audio bitrate in bits per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate_bps: Option<u32>,
    /// Audio channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    /// Audio sample rate in Hz.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,
}

/// Progress update, expressed in parts per thousand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 0 ..= 1000.
    pub per_mille: u32,
}

impl ProgressEvent {
    /// Per-mille value that marks a finished conversion.
    pub const COMPLETE: u32 = 1000;

    pub fn new(per_mille: u32) -> Self {
        Self {
            per_mille: per_mille.min(Self::COMPLETE),
        }
    }

    /// Progress as a percentage (0.0 - 100.0).
    pub fn percent(&self) -> f64 {
        f64::from(self.per_mille) / 10.0
    }

    pub fn is_complete(&self) -> bool {
        self.per_mille >= Self::COMPLETE
    }
}
