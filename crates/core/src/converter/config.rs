//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the FFmpeg-based encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Additional ffmpeg arguments, inserted before the output path.
    #[serde(default)]
    pub extra_ffmpeg_args: Vec<String>,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_log_level() -> String {
    "warning".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            ffmpeg_log_level: default_log_level(),
            extra_ffmpeg_args: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with custom ffmpeg/ffprobe paths.
    pub fn with_paths(ffmpeg_path: PathBuf, ffprobe_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            ..Default::default()
        }
    }

    /// Sets the ffmpeg log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.ffmpeg_log_level = level.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.ffmpeg_log_level, "warning");
        assert!(config.extra_ffmpeg_args.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = ConverterConfig::with_paths(
            PathBuf::from("/usr/local/bin/ffmpeg"),
            PathBuf::from("/usr/local/bin/ffprobe"),
        )
        .with_log_level("error");

        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(config.ffprobe_path, PathBuf::from("/usr/local/bin/ffprobe"));
        assert_eq!(config.ffmpeg_log_level, "error");
    }

    #[test]
    fn test_config_serialization() {
        let config = ConverterConfig::default().with_log_level("info");
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ConverterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
