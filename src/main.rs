use anyhow::{Context, Result};
use std::path::PathBuf;

use whisper_transcribe::transcription::prepare_model;
use whisper_transcribe::{telemetry, ModelVariant, TranscriptionEngine};

fn main() -> Result<()> {
    telemetry::init()?;

    // Single positional argument: the audio file path
    let audio_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: whisper-transcribe <audio-file>")?;

    // Load the model once; everything after reuses the same handle
    let variant = ModelVariant::default();
    let model_path = prepare_model(variant)?;

    let threads = std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get);
    let engine = TranscriptionEngine::new(&model_path, threads, 1, None)?;

    let result = engine.transcribe_file(&audio_path)?;

    println!("{}", result.text);

    Ok(())
}
