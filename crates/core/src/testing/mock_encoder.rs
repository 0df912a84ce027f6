//! Mock encoder for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::converter::{
    Encoder, EncoderError, EncoderListener, EncodingAttributes, ProgressEvent, SourceInfo,
};

/// A recorded encode call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncoding {
    /// Input path passed to the encoder.
    pub input: PathBuf,
    /// Output path passed to the encoder.
    pub output: PathBuf,
    /// Attributes passed to the encoder.
    pub attributes: EncodingAttributes,
}

/// Mock implementation of the Encoder trait.
///
/// Provides controllable behavior for testing:
/// - Track encode calls for assertions
/// - Simulate probe and encode failures
/// - Control the reported source info
/// - Replay progress events and messages to the listener
/// - Write an output file of a chosen size
///
/// # Example
///
/// ```rust,ignore
/// use audio_converter_core::testing::MockEncoder;
///
/// let encoder = MockEncoder::new();
/// encoder.set_source_info(SourceInfo { duration_ms: 180_000, ..Default::default() });
/// encoder.set_output_size(4096);
///
/// encoder.encode(input, output, &attributes, &mut listener).await?;
///
/// assert_eq!(encoder.recorded_encodings().len(), 1);
/// ```
#[derive(Debug)]
pub struct MockEncoder {
    /// Recorded encode calls.
    encodings: Mutex<Vec<RecordedEncoding>>,
    /// Source info returned by probe and reported during encode.
    source_info: Mutex<Option<SourceInfo>>,
    /// If set, the next probe fails with this error.
    probe_error: Mutex<Option<EncoderError>>,
    /// If set, the next encode fails with this error.
    encode_error: Mutex<Option<EncoderError>>,
    /// Per-mille values replayed before the final completion event.
    progress_steps: Mutex<Vec<u32>>,
    /// Messages replayed to the listener.
    messages: Mutex<Vec<String>>,
    /// Size of the output file written on success.
    output_size: Mutex<usize>,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self {
            encodings: Mutex::new(Vec::new()),
            source_info: Mutex::new(None),
            probe_error: Mutex::new(None),
            encode_error: Mutex::new(None),
            progress_steps: Mutex::new(vec![250, 500, 750]),
            messages: Mutex::new(Vec::new()),
            output_size: Mutex::new(1024),
        }
    }

    /// Get all recorded encode calls.
    pub fn recorded_encodings(&self) -> Vec<RecordedEncoding> {
        self.encodings.lock().unwrap().clone()
    }

    /// Set the source info returned by probe.
    pub fn set_source_info(&self, info: SourceInfo) {
        *self.source_info.lock().unwrap() = Some(info);
    }

    /// Configure the next probe to fail with the given error.
    pub fn set_probe_error(&self, error: EncoderError) {
        *self.probe_error.lock().unwrap() = Some(error);
    }

    /// Configure the next encode to fail with the given error.
    pub fn set_encode_error(&self, error: EncoderError) {
        *self.encode_error.lock().unwrap() = Some(error);
    }

    /// Set the per-mille values replayed during encode.
    pub fn set_progress_steps(&self, steps: Vec<u32>) {
        *self.progress_steps.lock().unwrap() = steps;
    }

    /// Add a message replayed during encode.
    pub fn push_message(&self, message: impl Into<String>) {
        self.messages.lock().unwrap().push(message.into());
    }

    /// Set the size of the output file written on success.
    pub fn set_output_size(&self, size: usize) {
        *self.output_size.lock().unwrap() = size;
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<SourceInfo, EncoderError> {
        if let Some(error) = self.probe_error.lock().unwrap().take() {
            return Err(error);
        }
        if !path.exists() {
            return Err(EncoderError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(self.source_info.lock().unwrap().clone().unwrap_or_default())
    }

    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        attributes: &EncodingAttributes,
        listener: &mut dyn EncoderListener,
    ) -> Result<(), EncoderError> {
        self.encodings.lock().unwrap().push(RecordedEncoding {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            attributes: attributes.clone(),
        });

        if let Some(error) = self.encode_error.lock().unwrap().take() {
            return Err(error);
        }

        let source_info = self.source_info.lock().unwrap().clone();
        if let Some(info) = source_info {
            listener.on_source_info(&info);
        }

        let steps = self.progress_steps.lock().unwrap().clone();
        for per_mille in steps {
            listener.on_progress(ProgressEvent::new(per_mille));
        }
        let messages = self.messages.lock().unwrap().clone();
        for message in &messages {
            listener.on_message(message);
        }

        let size = *self.output_size.lock().unwrap();
        tokio::fs::write(output, vec![0u8; size]).await?;

        listener.on_progress(ProgressEvent::new(ProgressEvent::COMPLETE));
        Ok(())
    }
}
