use thiserror::Error;

/// Errors that can occur across the transcription pipeline
///
/// Every variant is fatal: nothing is retried, the error propagates to
/// `main` which reports it and exits non-zero.
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// The requested model variant could not be obtained or loaded
    #[error("model unavailable ({variant}): {source}")]
    ModelUnavailable {
        /// Variant tag that was requested
        variant: String,
        /// Underlying error
        source: anyhow::Error,
    },

    /// The audio path does not exist or cannot be opened
    #[error("cannot read audio file {path}: {source}")]
    AudioUnreadable {
        /// Path that was given on the command line
        path: String,
        /// Underlying I/O error
        source: anyhow::Error,
    },

    /// The file was opened but its contents are not decodable audio
    #[error("cannot decode audio file {path}: {source}")]
    DecodeFailure {
        /// Path that was given on the command line
        path: String,
        /// Underlying decoder error
        source: anyhow::Error,
    },

    /// Whisper inference failed after the audio was decoded
    #[error("inference failed: {0}")]
    InferenceFailure(#[source] anyhow::Error),
}
