//! Whisper Transcribe - single-shot audio file transcription
//!
//! Load a pretrained Whisper model once, transcribe one audio file,
//! return the recognized text. This library exports the pipeline
//! pieces for testing and reuse; the binary wires them together.

/// Audio file decoding into model-ready samples
pub mod audio;
/// Error taxonomy for the transcription pipeline
pub mod error;
/// Telemetry and logging
pub mod telemetry;
/// Model loading and Whisper inference
pub mod transcription;

pub use error::TranscribeError;
pub use transcription::{ModelVariant, TranscriptionEngine, TranscriptionResult};
