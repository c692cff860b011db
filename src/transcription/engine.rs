use std::path::Path;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::error::TranscribeError;

/// Trait for transcription operations (enables testing via mocking)
///
/// Production code uses the concrete [`TranscriptionEngine`] type
/// directly; tests use `MockTranscriptionInterface` (via `mockall`) to
/// exercise caller behavior without real model weights.
#[cfg_attr(test, mockall::automock)]
#[allow(dead_code)] // Only exercised through the mock in tests
trait TranscriptionInterface: Send + Sync {
    /// Transcribe audio samples to text
    ///
    /// # Errors
    /// Returns error if Whisper inference fails
    fn transcribe(&self, audio_data: &[f32]) -> Result<TranscriptionResult, TranscribeError>;
}

/// One decoded segment of the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    /// Segment start offset in milliseconds
    pub start_ms: i64,
    /// Segment end offset in milliseconds
    pub end_ms: i64,
    /// Decoded text for this segment
    pub text: String,
}

/// The output of one inference call over one audio input
///
/// The command-line tool consumes only `text`; segment-level detail is
/// available to library callers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranscriptionResult {
    /// Full recognized text, whitespace-trimmed
    pub text: String,
    /// Per-segment breakdown with timestamps
    pub segments: Vec<TranscriptSegment>,
}

/// Whisper transcription engine
///
/// Loaded once per process and reusable for any number of
/// transcription calls; a fresh Whisper state is created per call.
pub struct TranscriptionEngine {
    /// Loaded Whisper context
    ctx: WhisperContext,
    /// Number of CPU threads for inference
    threads: i32,
    /// Beam search width (1 = greedy)
    beam_size: i32,
    /// Language code (None = auto-detect)
    language: Option<String>,
}

impl TranscriptionEngine {
    /// Determines sampling strategy based on beam size (pure, testable)
    const fn get_sampling_strategy(beam_size: i32) -> SamplingStrategy {
        if beam_size > 1 {
            SamplingStrategy::BeamSearch {
                beam_size,
                patience: -1.0,
            }
        } else {
            SamplingStrategy::Greedy { best_of: 1 }
        }
    }

    /// Creates a new `TranscriptionEngine` by loading the model from the given path
    ///
    /// # Errors
    /// Returns [`TranscribeError::ModelUnavailable`] if the weight file
    /// doesn't exist, is invalid, or the settings are out of range
    pub fn new(
        model_path: &Path,
        threads: usize,
        beam_size: usize,
        language: Option<String>,
    ) -> Result<Self, TranscribeError> {
        let load_error = |source: anyhow::Error| TranscribeError::ModelUnavailable {
            variant: model_path.display().to_string(),
            source,
        };

        if threads == 0 {
            return Err(load_error(anyhow::anyhow!("threads must be > 0")));
        }
        if beam_size == 0 {
            return Err(load_error(anyhow::anyhow!("beam_size must be > 0")));
        }

        // Validate that threads and beam_size fit in i32 (required by whisper-rs API)
        let threads_i32 = i32::try_from(threads).map_err(|_| {
            load_error(anyhow::anyhow!("threads value too large (max: {})", i32::MAX))
        })?;
        let beam_size_i32 = i32::try_from(beam_size).map_err(|_| {
            load_error(anyhow::anyhow!(
                "beam_size value too large (max: {})",
                i32::MAX
            ))
        })?;

        tracing::info!(
            path = %model_path.display(),
            threads = threads,
            beam_size = beam_size,
            language = ?language,
            "loading whisper model"
        );

        let path_str = model_path
            .to_str()
            .ok_or_else(|| load_error(anyhow::anyhow!("model path contains invalid UTF-8")))?;

        let params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(path_str, params)
            .map_err(|e| load_error(anyhow::anyhow!("{e:?}")))?;

        tracing::info!("whisper model loaded successfully");

        Ok(Self {
            ctx,
            threads: threads_i32,
            beam_size: beam_size_i32,
            language,
        })
    }

    /// Transcribes the audio file at `path`
    ///
    /// Reads and decodes the file, then runs inference over its samples.
    ///
    /// # Errors
    /// Returns [`TranscribeError::AudioUnreadable`] or
    /// [`TranscribeError::DecodeFailure`] from the audio front-end, and
    /// [`TranscribeError::InferenceFailure`] if Whisper inference fails
    pub fn transcribe_file(&self, path: &Path) -> Result<TranscriptionResult, TranscribeError> {
        let samples = crate::audio::load_audio(path)?;
        self.transcribe(&samples)
    }

    /// Transcribes audio samples (16kHz mono f32) to text
    ///
    /// # Errors
    /// Returns [`TranscribeError::InferenceFailure`] if Whisper inference fails
    pub fn transcribe(&self, audio_data: &[f32]) -> Result<TranscriptionResult, TranscribeError> {
        let _span = tracing::debug_span!("transcription", samples = audio_data.len()).entered();
        tracing::debug!("starting transcription");

        // Create state for this transcription
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| TranscribeError::InferenceFailure(anyhow::anyhow!("{e:?}")))?;

        // Configure transcription parameters
        let strategy = Self::get_sampling_strategy(self.beam_size);
        let mut params = FullParams::new(strategy);
        params.set_n_threads(self.threads);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_language(self.language.as_deref()); // Use configured language or auto-detect
        params.set_translate(false);

        // Run transcription
        let start = std::time::Instant::now();
        state
            .full(params, audio_data)
            .map_err(|e| TranscribeError::InferenceFailure(anyhow::anyhow!("{e:?}")))?;
        let inference_duration = start.elapsed();

        // Collect text and per-segment timestamps
        let mut text = String::new();
        let mut segments = Vec::new();
        for segment in state.as_iter() {
            let segment_text = segment.to_string();
            text.push_str(&segment_text);
            segments.push(TranscriptSegment {
                // whisper timestamps are in centiseconds
                start_ms: segment.start_timestamp() * 10,
                end_ms: segment.end_timestamp() * 10,
                text: segment_text.trim().to_owned(),
            });
        }

        let text = text.trim().to_owned();

        tracing::info!(
            segments = segments.len(),
            text_len = text.len(),
            inference_ms = inference_duration.as_millis(),
            "transcription completed"
        );

        Ok(TranscriptionResult { text, segments })
    }
}

/// Implement trait for real `TranscriptionEngine`
impl TranscriptionInterface for TranscriptionEngine {
    fn transcribe(&self, audio_data: &[f32]) -> Result<TranscriptionResult, TranscribeError> {
        Self::transcribe(self, audio_data)
    }
}
