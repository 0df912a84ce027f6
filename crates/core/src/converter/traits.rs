//! Trait definitions for the converter module.

use async_trait::async_trait;
use std::path::Path;

use super::error::EncoderError;
use super::types::{EncodingAttributes, ProgressEvent, SourceInfo};

/// Receives events from an [`Encoder`] while a conversion runs.
///
/// Events are delivered one at a time from the task driving the encoder,
/// so implementations never see concurrent calls.
pub trait EncoderListener: Send {
    /// Source metadata became available.
    fn on_source_info(&mut self, info: &SourceInfo);

    /// Conversion progressed.
    fn on_progress(&mut self, event: ProgressEvent);

    /// The encoder emitted an informational message.
    fn on_message(&mut self, message: &str);
}

/// An external encoder that can probe and transcode audio files.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Reads source metadata from a media file.
    async fn probe(&self, path: &Path) -> Result<SourceInfo, EncoderError>;

    /// Transcodes `input` into `output`, reporting to `listener` until done.
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        attributes: &EncodingAttributes,
        listener: &mut dyn EncoderListener,
    ) -> Result<(), EncoderError>;
}
