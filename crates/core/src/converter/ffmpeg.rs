//! FFmpeg-based encoder implementation.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use super::config::ConverterConfig;
use super::error::EncoderError;
use super::traits::{Encoder, EncoderListener};
use super::types::{EncodingAttributes, ProgressEvent, SourceInfo};

/// `out_time_us` and `out_time_ms` both carry microseconds.
static OUT_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^out_time_(?:us|ms)=(\d+)$").unwrap());

/// Any other `key=value` line of the `-progress` report.
static PROGRESS_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]+=").unwrap());

/// Classification of a single ffmpeg stderr line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StderrLine {
    /// Output position advanced.
    Progress(ProgressEvent),
    /// `progress=end`, ffmpeg finished writing.
    End,
    /// Diagnostic text from ffmpeg.
    Message(String),
    /// Progress bookkeeping we don't use, or blank lines.
    Ignored,
}

/// Turns ffmpeg `-progress` output into per-mille events.
#[derive(Debug, Clone, Copy)]
struct ProgressParser {
    duration_ms: i64,
}

impl ProgressParser {
    fn new(duration_ms: i64) -> Self {
        Self { duration_ms }
    }

    fn parse_line(&self, line: &str) -> StderrLine {
        let line = line.trim();
        if line.is_empty() {
            return StderrLine::Ignored;
        }
        if line == "progress=end" {
            return StderrLine::End;
        }
        if let Some(caps) = OUT_TIME_RE.captures(line) {
            return match caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok()) {
                Some(micros) => self
                    .per_mille(micros / 1000)
                    .map(|p| StderrLine::Progress(ProgressEvent::new(p)))
                    .unwrap_or(StderrLine::Ignored),
                None => StderrLine::Ignored,
            };
        }
        if PROGRESS_KEY_RE.is_match(line) {
            return StderrLine::Ignored;
        }
        StderrLine::Message(line.to_string())
    }

    /// Position as parts per thousand; 1000 is reserved for a finished run.
    fn per_mille(&self, position_ms: i64) -> Option<u32> {
        if self.duration_ms <= 0 {
            return None;
        }
        let per_mille = (position_ms.max(0) * 1000 / self.duration_ms).min(999);
        u32::try_from(per_mille).ok()
    }
}

/// FFmpeg-based encoder implementation.
pub struct FfmpegEncoder {
    config: ConverterConfig,
}

impl FfmpegEncoder {
    /// Creates a new FFmpeg encoder with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates an encoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Builds ffmpeg arguments for an audio-only conversion.
    fn build_args(
        &self,
        input_path: &Path,
        output_path: &Path,
        attributes: &EncodingAttributes,
    ) -> Vec<String> {
        let audio = &attributes.audio;
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-vn".to_string(), // Drop embedded artwork / video
            "-c:a".to_string(),
            audio.codec.clone(),
        ];

        if let Some(bit_rate) = audio.bit_rate_bps {
            args.extend(["-b:a".to_string(), bit_rate.to_string()]);
        }

        args.extend([
            "-ac".to_string(),
            audio.channels.to_string(),
            "-ar".to_string(),
            audio.sample_rate_hz.to_string(),
            "-f".to_string(),
            attributes.output_format.clone(),
        ]);

        // Log level and progress
        args.extend([
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-nostats".to_string(),
            "-progress".to_string(),
            "pipe:2".to_string(),
        ]);

        // Extra args
        args.extend(self.config.extra_ffmpeg_args.iter().cloned());

        // Output
        args.push(output_path.to_string_lossy().to_string());

        args
    }

    /// Parses ffprobe JSON output into SourceInfo.
    fn parse_probe_output(output: &str) -> Result<SourceInfo, EncoderError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            format: ProbeFormat,
            #[serde(default)]
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            format_name: Option<String>,
            duration: Option<String>,
            bit_rate: Option<String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            codec_type: String,
            codec_name: Option<String>,
            bit_rate: Option<String>,
            sample_rate: Option<String>,
            channels: Option<u8>,
        }

        let probe: ProbeOutput =
            serde_json::from_str(output).map_err(|e| EncoderError::ParseError {
                reason: format!("Failed to parse ffprobe output: {}", e),
            })?;

        let duration_ms = probe
            .format
            .duration
            .as_ref()
            .and_then(|d| d.parse::<f64>().ok())
            .map(|secs| (secs * 1000.0).round() as i64)
            .unwrap_or(0);

        let audio_stream = probe.streams.iter().find(|s| s.codec_type == "audio");

        let bit_rate_bps = audio_stream
            .and_then(|s| s.bit_rate.as_ref())
            .or(probe.format.bit_rate.as_ref())
            .and_then(|b| b.parse::<u32>().ok());

        Ok(SourceInfo {
            duration_ms,
            format: probe
                .format
                .format_name
                .as_deref()
                .and_then(|name| name.split(',').next())
                .map(str::to_string),
            codec: audio_stream.and_then(|s| s.codec_name.clone()),
            bit_rate_bps,
            channels: audio_stream.and_then(|s| s.channels),
            sample_rate_hz: audio_stream
                .and_then(|s| s.sample_rate.as_ref())
                .and_then(|r| r.parse::<u32>().ok()),
        })
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> Result<SourceInfo, EncoderError> {
        if !path.exists() {
            return Err(EncoderError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EncoderError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    EncoderError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(EncoderError::probe_failed(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info = Self::parse_probe_output(&stdout)?;
        debug!(path = %path.display(), ?info, "Probed source file");
        Ok(info)
    }

    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        attributes: &EncodingAttributes,
        listener: &mut dyn EncoderListener,
    ) -> Result<(), EncoderError> {
        if !input.exists() {
            return Err(EncoderError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        // Ensure output directory exists
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|_| {
                EncoderError::OutputDirectoryFailed {
                    path: parent.to_path_buf(),
                }
            })?;
        }

        // Source info drives the progress calculation
        let duration_ms = match self.probe(input).await {
            Ok(info) => {
                listener.on_source_info(&info);
                info.duration_ms
            }
            Err(e) => {
                debug!(error = %e, "Probe before encoding failed, progress will not be reported");
                0
            }
        };

        let args = self.build_args(input, output, attributes);
        debug!(ffmpeg = %self.config.ffmpeg_path.display(), ?args, "Starting ffmpeg");

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EncoderError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    EncoderError::Io(e)
                }
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| EncoderError::encoding_failed("ffmpeg stderr was not captured", None))?;
        // ffmpeg echoes tags and paths verbatim, so lines are not guaranteed UTF-8
        let mut reader = BufReader::new(stderr).split(b'\n');

        let parser = ProgressParser::new(duration_ms);
        let mut error_output = String::new();
        let mut reached_end = false;

        while let Some(raw) = reader.next_segment().await? {
            let line = String::from_utf8_lossy(&raw);
            match parser.parse_line(&line) {
                StderrLine::Progress(event) => listener.on_progress(event),
                StderrLine::End => reached_end = true,
                StderrLine::Message(message) => {
                    listener.on_message(&message);
                    error_output.push_str(&message);
                    error_output.push('\n');
                }
                StderrLine::Ignored => {}
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(EncoderError::encoding_failed(
                format!("FFmpeg exited with code: {:?}", status.code()),
                if error_output.is_empty() {
                    None
                } else {
                    Some(error_output)
                },
            ));
        }

        debug!(reached_end, "ffmpeg finished");
        listener.on_progress(ProgressEvent::new(ProgressEvent::COMPLETE));
        Ok(())
    }
}
