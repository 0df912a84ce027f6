//! Terminal progress reporting for a single conversion.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use tracing::warn;

use super::format::format_duration;
use crate::converter::{EncoderListener, ProgressEvent, SourceInfo};

/// Minimum wall-clock time between two progress renders.
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// Number of cells in the progress bar.
pub const BAR_WIDTH: usize = 30;

/// Character for a filled cell.
pub const FILL: char = '=';

/// Character for an empty cell.
pub const EMPTY: char = '-';

/// Renders a progress bar for `percentage` (0.0 - 100.0).
///
/// The cell right after the filled run gets a double fill whenever the
/// percentage is not an exact multiple of one cell, so most partial bars
/// render one character wider than [`BAR_WIDTH`]. Output stays compatible
/// with the bars this tool has always printed.
pub fn progress_bar(percentage: f64) -> String {
    let filled = (BAR_WIDTH as f64 * percentage / 100.0) as usize;
    let cell = 100.0 / BAR_WIDTH as f64;

    let mut bar = String::with_capacity(BAR_WIDTH + 3);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        if i < filled {
            bar.push(FILL);
        } else if i == filled && percentage % cell > 0.0 {
            bar.push(FILL);
            bar.push(FILL);
        } else {
            bar.push(EMPTY);
        }
    }
    bar.push(']');
    bar
}

/// Listener that prints source info, a throttled progress bar and encoder
/// messages to a text stream.
pub struct ProgressReporter<W: Write> {
    out: W,
    total_duration_ms: i64,
    last_emit: Option<Instant>,
}

impl<W: Write> ProgressReporter<W> {
    /// Creates a reporter seeded with the duration known before encoding.
    pub fn new(out: W, total_duration_ms: i64) -> Self {
        Self {
            out,
            total_duration_ms,
            last_emit: None,
        }
    }

    /// Duration used for the `processed/total` display.
    pub fn total_duration_ms(&self) -> i64 {
        self.total_duration_ms
    }

    /// Consumes the reporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_source_info(&mut self, info: &SourceInfo) -> io::Result<()> {
        if info.duration_ms > 0 {
            self.total_duration_ms = info.duration_ms;
        }

        writeln!(self.out)?;
        writeln!(self.out, "File information:")?;
        writeln!(self.out, "Duration: {}", format_duration(info.duration_ms))?;
        if let Some(bit_rate) = info.bit_rate_bps {
            writeln!(self.out, "Bitrate: {} bps", bit_rate)?;
        }
        if let Some(channels) = info.channels {
            writeln!(self.out, "Channels: {}", channels)?;
        }
        if let Some(sample_rate) = info.sample_rate_hz {
            writeln!(self.out, "Sampling rate: {} Hz", sample_rate)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Renders `event` unless throttled. Returns whether anything was written.
    fn write_progress(&mut self, event: ProgressEvent, now: Instant) -> io::Result<bool> {
        let due = self
            .last_emit
            .map_or(true, |last| now.saturating_duration_since(last) >= UPDATE_INTERVAL);
        if !due && !event.is_complete() {
            return Ok(false);
        }
        self.last_emit = Some(now);

        let percentage = event.percent();
        let processed_ms = self
            .total_duration_ms
            .saturating_mul(i64::from(event.per_mille))
            / 1000;

        write!(
            self.out,
            "\rProgress: {} {:.1}% ({}/{})",
            progress_bar(percentage),
            percentage,
            format_duration(processed_ms),
            format_duration(self.total_duration_ms)
        )?;
        if event.is_complete() {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(true)
    }

    fn write_message(&mut self, message: &str) -> io::Result<()> {
        if message.trim().is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "Info: {}", message)?;
        self.out.flush()
    }
}

impl<W: Write + Send> EncoderListener for ProgressReporter<W> {
    fn on_source_info(&mut self, info: &SourceInfo) {
        if let Err(e) = self.write_source_info(info) {
            warn!(error = %e, "Failed to write source info");
        }
    }

    fn on_progress(&mut self, event: ProgressEvent) {
        if let Err(e) = self.write_progress(event, Instant::now()) {
            warn!(error = %e, "Failed to write progress");
        }
    }

    fn on_message(&mut self, message: &str) {
        if let Err(e) = self.write_message(message) {
            warn!(error = %e, "Failed to write encoder message");
        }
    }
}
