//! Human-readable formatting for durations, sizes and size ratios.

use std::fmt;
use std::time::Duration;

/// Unit letters for successive powers of 1024.
const SIZE_UNITS: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Formats a media duration as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_duration(duration_ms: i64) -> String {
    if duration_ms <= 0 {
        return "00:00".to_string();
    }

    let total_secs = duration_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Formats wall-clock time as `Xm Ys`, or `Ys` under a minute.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Formats a byte count with a base-1024 unit (`500 B`, `2.0 KB`, `1.0 MB`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    // floor(log1024(bytes)), at least 1 here
    let exp = ((63 - bytes.leading_zeros()) / 10) as usize;
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{:.1} {}B", value, SIZE_UNITS[exp - 1])
}

/// How the output size compares with the input size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeChange {
    /// Output is smaller; `percent` is the reduction.
    Reduction { ratio: f64, percent: f64 },
    /// Output is larger; `percent` is the growth.
    Increase { ratio: f64, percent: f64 },
    /// Both files have the same size.
    NoChange,
}

impl SizeChange {
    /// Compares two file sizes. `None` when the input is empty.
    pub fn between(input_bytes: u64, output_bytes: u64) -> Option<Self> {
        if input_bytes == 0 {
            return None;
        }

        let ratio = output_bytes as f64 / input_bytes as f64;
        let change = if ratio < 1.0 {
            Self::Reduction {
                ratio,
                percent: (1.0 - ratio) * 100.0,
            }
        } else if ratio > 1.0 {
            Self::Increase {
                ratio,
                percent: (ratio - 1.0) * 100.0,
            }
        } else {
            Self::NoChange
        };
        Some(change)
    }
}

impl fmt::Display for SizeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reduction { ratio, percent } => write!(
                f,
                "Compression ratio: {:.2} ({:.1}% reduction)",
                ratio, percent
            ),
            Self::Increase { ratio, percent } => write!(
                f,
                "Compression ratio: {:.2} ({:.1}% increase)",
                ratio, percent
            ),
            Self::NoChange => write!(f, "Size change: 0.0% (no change)"),
        }
    }
}
