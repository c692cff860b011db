/// Model variant tags, weight resolution and download
pub mod download;
/// Whisper model inference engine
pub mod engine;

pub use download::{prepare_model, ModelVariant};
pub use engine::{TranscriptionEngine, TranscriptionResult};
