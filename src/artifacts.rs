use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::classifier::SentimentError;

/// File names expected inside a model directory.
pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";
pub const LABELS_FILE: &str = "labels.json";

/// Locates the packaged classifier artifacts on disk.
///
/// A model directory holds three files: the ONNX classifier (`model.onnx`),
/// its tokenizer (`tokenizer.json`) and the label encoder (`labels.json`).
/// The store only resolves paths and checks presence; deserialization happens
/// during classifier construction.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    model_dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at the default model directory.
    pub fn new_default() -> io::Result<Self> {
        Ok(Self::new(Self::default_model_dir()))
    }

    /// Returns the default model directory path.
    pub fn default_model_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("TONALITY_MODEL_DIR") {
            return PathBuf::from(path);
        }

        // 2. A `model` directory next to the working directory
        let local = PathBuf::from("model");
        if local.is_dir() {
            return local;
        }

        // 3. Platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("tonality").join("model");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("tonality").join("model")
    }

    pub fn new<P: AsRef<Path>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.as_ref().to_path_buf(),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join(TOKENIZER_FILE)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.model_dir.join(LABELS_FILE)
    }

    pub fn artifacts_present(&self) -> bool {
        self.verify_artifacts().is_ok()
    }

    /// Checks that every artifact file exists before anything is deserialized.
    ///
    /// Fails with [`SentimentError::ArtifactNotFound`] naming the first
    /// missing path; the model file is checked first, then the tokenizer,
    /// then the label encoder.
    pub fn verify_artifacts(&self) -> Result<(), SentimentError> {
        for path in [self.model_path(), self.tokenizer_path(), self.labels_path()] {
            log::debug!("Checking artifact {:?} (exists: {})", path, path.exists());
            if !path.exists() {
                return Err(SentimentError::ArtifactNotFound(path));
            }
        }
        Ok(())
    }
}
