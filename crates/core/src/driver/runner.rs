//! Runs one conversion end to end and prints its report.

use std::io::{ErrorKind, Write};
use std::time::Instant;

use tracing::{debug, info};

use super::error::DriverError;
use super::types::{ConversionRequest, ConversionSummary};
use crate::converter::{
    output_extension, resolve_format, AudioAttributes, Encoder, EncoderError, EncodingAttributes,
};
use crate::report::{format_elapsed, format_file_size, ProgressReporter, SizeChange};

/// Drives an [`Encoder`] through a single conversion, writing the banner,
/// progress and summary to a text stream.
pub struct ConversionDriver<E> {
    encoder: E,
}

impl<E: Encoder> ConversionDriver<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    /// The wrapped encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Converts `request.input_path` into `request.output_path`.
    pub async fn convert<W: Write + Send>(
        &self,
        request: &ConversionRequest,
        out: &mut W,
    ) -> Result<ConversionSummary, DriverError> {
        let input = request.input_path.as_path();
        let output = request.output_path.as_path();

        Self::validate_input(request).await?;

        let duration_ms = match self.encoder.probe(input).await {
            Ok(info) => info.duration_ms,
            Err(e) => {
                info!(error = %e, "Could not probe source duration");
                writeln!(out, "Could not read the file duration, continuing...")?;
                0
            }
        };

        let extension = output_extension(output);
        let resolved = resolve_format(&extension);
        if !resolved.recognized {
            writeln!(out, "Unrecognized format, using default settings (MP3)")?;
        }
        let attributes = EncodingAttributes::new(
            resolved.format,
            AudioAttributes::for_format(resolved.format),
        );

        writeln!(out, "Starting audio conversion...")?;
        writeln!(out, "Input: {}", input.display())?;
        writeln!(out, "Output: {}", output.display())?;
        writeln!(out, "Format: {}", extension.to_uppercase())?;
        out.flush()?;

        debug!(
            encoder = self.encoder.name(),
            ?attributes,
            duration_ms,
            "Starting conversion"
        );

        let start = Instant::now();
        {
            let mut reporter = ProgressReporter::new(&mut *out, duration_ms);
            self.encoder
                .encode(input, output, &attributes, &mut reporter)
                .await?;
        }
        let elapsed = start.elapsed();

        let input_size = tokio::fs::metadata(input).await?.len();
        let output_size = tokio::fs::metadata(output)
            .await
            .map_err(|_| EncoderError::encoding_failed("Output file not created", None))?
            .len();
        let size_change = SizeChange::between(input_size, output_size);

        writeln!(out)?;
        writeln!(out, "Conversion completed successfully")?;
        writeln!(out, "Elapsed time: {}", format_elapsed(elapsed))?;
        writeln!(out)?;
        writeln!(out, "File sizes:")?;
        writeln!(out, "Original file: {}", format_file_size(input_size))?;
        writeln!(out, "Converted file: {}", format_file_size(output_size))?;
        if let Some(change) = size_change {
            writeln!(out, "{}", change)?;
        }
        out.flush()?;

        Ok(ConversionSummary {
            format: resolved.format,
            elapsed,
            input_size,
            output_size,
            size_change,
        })
    }

    async fn validate_input(request: &ConversionRequest) -> Result<(), DriverError> {
        let metadata = match tokio::fs::metadata(&request.input_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DriverError::InputNotFound {
                    path: request.input_path.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_file() {
            return Err(DriverError::NotAFile {
                path: request.input_path.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{AudioFormat, SourceInfo};
    use crate::testing::MockEncoder;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_input(dir: &TempDir, name: &str, len: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    fn source_info(duration_ms: i64) -> SourceInfo {
        SourceInfo {
            duration_ms,
            bit_rate_bps: Some(1_411_000),
            channels: Some(2),
            sample_rate_hz: Some(44_100),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_convert_reports_reduction() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "song.wav", 1000);
        let output = dir.path().join("song.mp3");

        let encoder = MockEncoder::new();
        encoder.set_source_info(source_info(180_000));
        encoder.set_output_size(500);

        let driver = ConversionDriver::new(encoder);
        let mut out = Vec::new();
        let summary = driver
            .convert(&ConversionRequest::new(&input, &output), &mut out)
            .await
            .unwrap();

        assert_eq!(summary.format, AudioFormat::Mp3);
        assert_eq!(summary.input_size, 1000);
        assert_eq!(summary.output_size, 500);
        assert!(matches!(
            summary.size_change,
            Some(SizeChange::Reduction { .. })
        ));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Starting audio conversion...\n"));
        assert!(text.contains(&format!("Input: {}\n", input.display())));
        assert!(text.contains("Format: MP3\n"));
        assert!(text.contains("Duration: 03:00\n"));
        assert!(text.contains("100.0% (03:00/03:00)\n"));
        assert!(text.contains("Conversion completed successfully\n"));
        assert!(text.contains("Elapsed time: 0s\n"));
        assert!(text.contains("Original file: 1000 B\n"));
        assert!(text.contains("Converted file: 500 B\n"));
        assert!(text.ends_with("Compression ratio: 0.50 (50.0% reduction)\n"));

        let recorded = driver.encoder().recorded_encodings();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].attributes.audio.codec, "libmp3lame");
        assert_eq!(recorded[0].attributes.output_format, "mp3");
    }

    #[tokio::test]
    async fn test_convert_reports_increase_and_no_change() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "song.mp3", 1000);

        let encoder = MockEncoder::new();
        encoder.set_output_size(2000);
        let driver = ConversionDriver::new(encoder);
        let mut out = Vec::new();
        driver
            .convert(
                &ConversionRequest::new(&input, dir.path().join("song.wav")),
                &mut out,
            )
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Format: WAV\n"));
        assert!(text.contains("Compression ratio: 2.00 (100.0% increase)\n"));

        driver.encoder().set_output_size(1000);
        let mut out = Vec::new();
        driver
            .convert(
                &ConversionRequest::new(&input, dir.path().join("song.flac")),
                &mut out,
            )
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Size change: 0.0% (no change)\n"));
    }

    #[tokio::test]
    async fn test_empty_input_has_no_ratio() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "empty.wav", 0);

        let encoder = MockEncoder::new();
        encoder.set_output_size(100);
        let driver = ConversionDriver::new(encoder);
        let mut out = Vec::new();
        let summary = driver
            .convert(
                &ConversionRequest::new(&input, dir.path().join("empty.ogg")),
                &mut out,
            )
            .await
            .unwrap();

        assert!(summary.size_change.is_none());
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Compression ratio"));
        assert!(!text.contains("Size change"));
    }

    #[tokio::test]
    async fn test_missing_input_is_rejected() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.mp3");
        let driver = ConversionDriver::new(MockEncoder::new());

        let err = driver
            .convert(
                &ConversionRequest::new(dir.path().join("missing.wav"), &output),
                &mut Vec::<u8>::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DriverError::InputNotFound { .. }));
        assert!(!output.exists());
        assert!(driver.encoder().recorded_encodings().is_empty());
    }

    #[tokio::test]
    async fn test_directory_input_is_rejected() {
        let dir = TempDir::new().unwrap();
        let driver = ConversionDriver::new(MockEncoder::new());

        let err = driver
            .convert(
                &ConversionRequest::new(dir.path(), dir.path().join("out.mp3")),
                &mut Vec::<u8>::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DriverError::NotAFile { .. }));
    }

    #[tokio::test]
    async fn test_probe_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "song.wav", 2048);

        let encoder = MockEncoder::new();
        encoder.set_probe_error(EncoderError::probe_failed("no duration"));
        let driver = ConversionDriver::new(encoder);
        let mut out = Vec::new();
        driver
            .convert(
                &ConversionRequest::new(&input, dir.path().join("song.ogg")),
                &mut out,
            )
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Could not read the file duration, continuing...\n"));
        assert!(text.contains("Original file: 2.0 KB\n"));
        assert!(text.contains("100.0% (00:00/00:00)\n"));
    }

    #[tokio::test]
    async fn test_unknown_extension_falls_back_to_mp3() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "song.wav", 10);

        let driver = ConversionDriver::new(MockEncoder::new());
        let mut out = Vec::new();
        let summary = driver
            .convert(
                &ConversionRequest::new(&input, dir.path().join("song.xyz")),
                &mut out,
            )
            .await
            .unwrap();

        assert_eq!(summary.format, AudioFormat::Mp3);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Unrecognized format, using default settings (MP3)\n"));
        assert!(text.contains("Format: XYZ\n"));
    }

    #[tokio::test]
    async fn test_encoding_failure_is_returned() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "song.wav", 10);
        let output = dir.path().join("song.mp3");

        let encoder = MockEncoder::new();
        encoder.set_encode_error(EncoderError::encoding_failed(
            "FFmpeg exited with code: Some(1)",
            Some("Unknown encoder 'libmp3lame'".to_string()),
        ));
        let driver = ConversionDriver::new(encoder);

        let err = driver
            .convert(&ConversionRequest::new(&input, &output), &mut Vec::<u8>::new())
            .await
            .unwrap_err();

        match err {
            DriverError::Encoding(inner) => {
                assert_eq!(inner.stderr(), Some("Unknown encoder 'libmp3lame'"))
            }
            other => panic!("expected encoding error, got {:?}", other),
        }
        assert!(!Path::new(&output).exists());
    }
}
