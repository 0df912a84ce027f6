//! Output format resolution from file extensions.

use std::path::Path;

use tracing::debug;

use super::types::{AudioAttributes, AudioFormat};

/// Extension assumed when the output path has none.
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Format used when the extension is not recognised.
pub const FALLBACK_FORMAT: AudioFormat = AudioFormat::Mp3;

/// Outcome of resolving an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFormat {
    /// Format that will be produced.
    pub format: AudioFormat,
    /// False when the extension was unknown and the fallback was used.
    pub recognized: bool,
}

/// Returns the lower-cased extension of `path`, or [`DEFAULT_EXTENSION`].
pub fn output_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Resolves an extension to an output format, falling back to MP3.
pub fn resolve_format(extension: &str) -> ResolvedFormat {
    match AudioFormat::from_extension(extension) {
        Some(format) => ResolvedFormat {
            format,
            recognized: true,
        },
        None => {
            debug!(
                extension,
                fallback = FALLBACK_FORMAT.extension(),
                "Unrecognized output format, using default settings"
            );
            ResolvedFormat {
                format: FALLBACK_FORMAT,
                recognized: false,
            }
        }
    }
}

/// Resolves an extension straight to its audio attributes.
pub fn resolve(extension: &str) -> AudioAttributes {
    AudioAttributes::for_format(resolve_format(extension).format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::types::{OUTPUT_CHANNELS, OUTPUT_SAMPLE_RATE_HZ};

    #[test]
    fn test_resolve_lookup_table() {
        let table = [
            ("mp3", "libmp3lame", Some(128_000)),
            ("wav", "pcm_s16le", None),
            ("ogg", "libvorbis", Some(128_000)),
            ("aac", "aac", Some(128_000)),
            ("flac", "flac", None),
            ("wma", "wmav2", Some(128_000)),
        ];

        for (extension, codec, bit_rate) in table {
            let attrs = resolve(extension);
            assert_eq!(attrs.codec, codec, "codec for {}", extension);
            assert_eq!(attrs.bit_rate_bps, bit_rate, "bitrate for {}", extension);
        }
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_mp3() {
        let resolved = resolve_format("xyz");
        assert_eq!(resolved.format, AudioFormat::Mp3);
        assert!(!resolved.recognized);

        let attrs = resolve("xyz");
        assert_eq!(attrs.codec, "libmp3lame");
        assert_eq!(attrs.bit_rate_bps, Some(128_000));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let resolved = resolve_format("WAV");
        assert!(resolved.recognized);
        assert_eq!(resolved.format, AudioFormat::Wav);
    }

    #[test]
    fn test_channels_and_sample_rate_are_fixed() {
        for extension in ["mp3", "wav", "ogg", "aac", "flac", "wma", "xyz", ""] {
            let attrs = resolve(extension);
            assert_eq!(attrs.channels, OUTPUT_CHANNELS);
            assert_eq!(attrs.channels, 2);
            assert_eq!(attrs.sample_rate_hz, OUTPUT_SAMPLE_RATE_HZ);
            assert_eq!(attrs.sample_rate_hz, 44_100);
        }
    }

    #[test]
    fn test_output_extension() {
        assert_eq!(output_extension(Path::new("song.FLAC")), "flac");
        assert_eq!(output_extension(Path::new("/tmp/dir.v2/out.ogg")), "ogg");
        assert_eq!(output_extension(Path::new("noext")), "mp3");
    }
}
