//! Console reporting for conversions.
//!
//! [`ProgressReporter`] listens to encoder events and renders a throttled
//! progress bar; the [`format`] helpers produce the durations, file sizes and
//! size ratios printed around it.

pub mod format;
mod progress;

pub use format::{format_duration, format_elapsed, format_file_size, SizeChange};
pub use progress::{progress_bar, ProgressReporter, BAR_WIDTH, EMPTY, FILL, UPDATE_INTERVAL};
