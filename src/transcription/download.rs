use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::TranscribeError;

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Pretrained Whisper model variant (size/configuration tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelVariant {
    /// ~75 MB, fastest, least accurate
    Tiny,
    /// English-only tiny model
    TinyEn,
    /// ~142 MB, the default
    #[default]
    Base,
    /// English-only base model
    BaseEn,
    /// ~466 MB
    Small,
    /// English-only small model
    SmallEn,
    /// ~1.5 GB
    Medium,
    /// English-only medium model
    MediumEn,
    /// ~3 GB, most accurate
    LargeV3,
}

impl ModelVariant {
    /// The tag used in weight filenames and download URLs
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::TinyEn => "tiny.en",
            Self::Base => "base",
            Self::BaseEn => "base.en",
            Self::Small => "small",
            Self::SmallEn => "small.en",
            Self::Medium => "medium",
            Self::MediumEn => "medium.en",
            Self::LargeV3 => "large-v3",
        }
    }

    /// Maps the variant to its ggml weight filename
    #[must_use]
    pub fn filename(self) -> String {
        format!("ggml-{}.bin", self.tag())
    }
}

impl FromStr for ModelVariant {
    type Err = TranscribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiny" => Ok(Self::Tiny),
            "tiny.en" => Ok(Self::TinyEn),
            "base" => Ok(Self::Base),
            "base.en" => Ok(Self::BaseEn),
            "small" => Ok(Self::Small),
            "small.en" => Ok(Self::SmallEn),
            "medium" => Ok(Self::Medium),
            "medium.en" => Ok(Self::MediumEn),
            "large-v3" => Ok(Self::LargeV3),
            other => Err(TranscribeError::ModelUnavailable {
                variant: other.to_owned(),
                source: anyhow::anyhow!("unsupported model variant tag"),
            }),
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Default directory for downloaded model weights
///
/// # Errors
/// Returns error if the HOME environment variable is not set
pub fn default_model_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".whisper-transcribe")
        .join("models"))
}

/// Resolves the weight file for a variant, downloading it on first use
///
/// # Errors
/// Returns [`TranscribeError::ModelUnavailable`] if the weights cannot
/// be located or downloaded.
pub fn prepare_model(variant: ModelVariant) -> Result<PathBuf, TranscribeError> {
    let wrap = |source: anyhow::Error| TranscribeError::ModelUnavailable {
        variant: variant.tag().to_owned(),
        source,
    };

    let model_path = default_model_dir().map_err(wrap)?.join(variant.filename());
    ensure_model_downloaded(variant, &model_path).map_err(wrap)?;
    Ok(model_path)
}

/// Ensures the model is downloaded, returns true if downloaded, false if already existed
///
/// # Errors
/// Returns error if the download or the final rename fails
pub fn ensure_model_downloaded(variant: ModelVariant, model_path: &Path) -> Result<bool> {
    if model_path.exists() {
        tracing::info!(
            path = %model_path.display(),
            "model already exists, skipping download"
        );
        return Ok(false);
    }

    tracing::info!(
        model = variant.tag(),
        path = %model_path.display(),
        "model not found, starting download"
    );

    download_model(variant, model_path)?;

    Ok(true)
}

fn download_model(variant: ModelVariant, model_path: &Path) -> Result<()> {
    let url = format!("{}/{}", MODEL_BASE_URL, variant.filename());

    // Create parent directory if it doesn't exist
    if let Some(parent) = model_path.parent() {
        fs::create_dir_all(parent).context("failed to create model directory")?;
    }

    tracing::info!(url = %url, "downloading model");

    // Download to temporary file first for atomic operation
    let temp_path = model_path.with_extension("tmp");

    let response = reqwest::blocking::get(&url)
        .with_context(|| format!("failed to download model from {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("download failed with status {}: {}", response.status(), url);
    }

    let bytes = response.bytes().context("failed to read response bytes")?;

    // Write to temp file
    let mut file = fs::File::create(&temp_path)
        .with_context(|| format!("failed to create temp file at {}", temp_path.display()))?;

    file.write_all(&bytes)
        .context("failed to write model to temp file")?;

    // Drop file handle before rename
    drop(file);

    // Atomic rename - if this fails, temp file remains and will be cleaned up next run
    fs::rename(&temp_path, model_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            temp_path.display(),
            model_path.display()
        )
    })?;

    tracing::info!(
        path = %model_path.display(),
        size = bytes.len(),
        "model downloaded successfully"
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_filename() {
        assert_eq!(ModelVariant::Small.filename(), "ggml-small.bin");
        assert_eq!(ModelVariant::Base.filename(), "ggml-base.bin");
        assert_eq!(ModelVariant::Tiny.filename(), "ggml-tiny.bin");
        assert_eq!(ModelVariant::BaseEn.filename(), "ggml-base.en.bin");
        assert_eq!(ModelVariant::LargeV3.filename(), "ggml-large-v3.bin");
    }

    #[test]
    fn test_variant_parse_round_trip() {
        for tag in [
            "tiny", "tiny.en", "base", "base.en", "small", "small.en", "medium", "medium.en",
            "large-v3",
        ] {
            let variant: ModelVariant = tag.parse().unwrap();
            assert_eq!(variant.tag(), tag);
        }
    }

    #[test]
    fn test_variant_parse_unsupported_tag() {
        let result: Result<ModelVariant, _> = "gigantic".parse();
        assert!(matches!(
            result,
            Err(TranscribeError::ModelUnavailable { .. })
        ));
        if let Err(TranscribeError::ModelUnavailable { variant, .. }) = result {
            assert_eq!(variant, "gigantic");
        }
    }

    #[test]
    fn test_default_variant_is_base() {
        assert_eq!(ModelVariant::default(), ModelVariant::Base);
    }

    #[test]
    fn test_ensure_model_downloaded_existing_file() {
        let temp_dir = std::env::temp_dir();
        let model_path = temp_dir.join("test_existing_model.bin");

        // Create a dummy file
        fs::write(&model_path, b"dummy model data").unwrap();

        let result = ensure_model_downloaded(ModelVariant::Small, &model_path).unwrap();

        // Should return false because file already existed
        assert!(!result);

        // Cleanup
        fs::remove_file(&model_path).unwrap();
    }

    #[test]
    #[ignore] // Requires network access and downloads large file
    fn test_download_model_integration() {
        let temp_dir = std::env::temp_dir();
        let model_path = temp_dir.join("test_downloaded_model.bin");

        // Ensure file doesn't exist
        let _ = fs::remove_file(&model_path);

        let result = ensure_model_downloaded(ModelVariant::Tiny, &model_path);

        assert!(result.is_ok());
        let downloaded = result.unwrap();
        assert!(downloaded); // Should be true because we downloaded it

        // File should exist and have content
        assert!(model_path.exists());
        let metadata = fs::metadata(&model_path).unwrap();
        assert!(metadata.len() > 0);

        // Cleanup
        fs::remove_file(&model_path).unwrap();
    }

    #[test]
    fn test_ensure_model_creates_parent_directory() {
        let temp_dir = std::env::temp_dir();
        let nested_path = temp_dir
            .join("whisper_transcribe_test")
            .join("nested")
            .join("test.bin");

        // Ensure directory doesn't exist
        let _ = fs::remove_dir_all(temp_dir.join("whisper_transcribe_test"));

        // Create dummy file to simulate existing model
        fs::create_dir_all(nested_path.parent().unwrap()).unwrap();
        fs::write(&nested_path, b"test").unwrap();

        let result = ensure_model_downloaded(ModelVariant::Small, &nested_path);
        assert!(result.is_ok());

        // Cleanup
        fs::remove_dir_all(temp_dir.join("whisper_transcribe_test")).unwrap();
    }

    #[test]
    fn test_default_model_dir_under_home() {
        let home = std::env::var("HOME").unwrap();
        let dir = default_model_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("models"));
    }
}
