use log::{error, info};
use ort::session::Session;
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;

use super::classifier::SentimentClassifier;
use super::error::SentimentError;
use super::inference::TextInference;
use super::labels::LabelEncoder;
use crate::artifacts::ArtifactStore;
use crate::runtime::{create_session_builder, resolve_device, Device, RuntimeConfig};

/// Default maximum sequence length; longer inputs are truncated.
pub const MAX_SEQUENCE_LENGTH: usize = 128;

/// Short text run through the model once at build time to read the width of
/// its classifier head.
const PROBE_TEXT: &str = "проверка";

/// A builder for constructing a [`SentimentClassifier`] with a fluent interface.
///
/// Artifact loading happens in [`with_artifacts`](Self::with_artifacts) and
/// runs exactly once; [`build`](Self::build) validates the loaded pair with a
/// probe forward pass and produces the Ready classifier.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    store: Option<ArtifactStore>,
    tokenizer: Option<Tokenizer>,
    session: Option<Session>,
    labels: Option<LabelEncoder>,
    device: Option<Device>,
    max_sequence_length: Option<usize>,
    runtime_config: RuntimeConfig,
}

impl TextInference for ClassifierBuilder {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        self.tokenizer.as_ref()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn max_sequence_length(&self) -> usize {
        self.max_sequence_length.unwrap_or(MAX_SEQUENCE_LENGTH)
    }
}

impl ClassifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX model execution.
    ///
    /// Must be called before [`with_artifacts`](Self::with_artifacts): the
    /// compute device is resolved from this configuration when the session is
    /// created, and the binding is immutable afterwards.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Overrides the maximum sequence length (default 128 tokens).
    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = Some(max_sequence_length);
        self
    }

    /// Loads the classifier artifacts from a model directory.
    ///
    /// Convenience wrapper over [`with_artifacts`](Self::with_artifacts).
    pub fn with_artifact_dir<P: AsRef<Path>>(self, model_dir: P) -> Result<Self, SentimentError> {
        self.with_artifacts(ArtifactStore::new(model_dir))
    }

    /// Loads and deserializes the classifier artifacts named by `store`.
    ///
    /// Every artifact file's presence is checked before anything is
    /// deserialized or any device code runs; a missing file fails with
    /// [`SentimentError::ArtifactNotFound`] naming that path. A present but
    /// unreadable artifact fails with [`SentimentError::ModelLoad`].
    ///
    /// On success the session is committed on the resolved compute device.
    /// The session is an inference-only graph: no training-time behavior is
    /// active and no call can mutate its weights.
    pub fn with_artifacts(mut self, store: ArtifactStore) -> Result<Self, SentimentError> {
        if self.store.is_some() {
            return Err(SentimentError::ModelLoad(
                "classifier artifacts already loaded".into(),
            ));
        }

        store.verify_artifacts()?;

        let tokenizer_path = store.tokenizer_path();
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            error!("Failed to load tokenizer: {}", e);
            SentimentError::ModelLoad(format!(
                "failed to load tokenizer {}: {e}",
                tokenizer_path.display()
            ))
        })?;
        info!("Tokenizer loaded successfully");

        let device = resolve_device(&self.runtime_config);
        let model_path = store.model_path();
        let session = create_session_builder(&self.runtime_config, device)
            .and_then(|builder| builder.commit_from_file(&model_path))
            .map_err(|e| {
                error!("Failed to load model: {}", e);
                SentimentError::ModelLoad(format!(
                    "failed to load model {}: {e}",
                    model_path.display()
                ))
            })?;

        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        let labels = LabelEncoder::from_file(store.labels_path())?;

        info!(
            "Loaded model {} with {} sentiment labels, device: {}",
            model_path.display(),
            labels.len(),
            device
        );

        self.store = Some(store);
        self.tokenizer = Some(tokenizer);
        self.session = Some(session);
        self.labels = Some(labels);
        self.device = Some(device);
        Ok(self)
    }

    /// Builds and returns the final classifier.
    ///
    /// Runs one probe forward pass to check that the width of the model's
    /// classifier head matches the label vocabulary; a mismatched artifact
    /// pair fails here rather than opaquely on the first real prediction.
    pub fn build(mut self) -> Result<SentimentClassifier, SentimentError> {
        let store = self
            .store
            .take()
            .ok_or_else(|| SentimentError::ModelLoad("no artifacts loaded".into()))?;

        // Probe pass: failures here mean a broken artifact pair, not a
        // per-call fault, so they surface as ModelLoad.
        let scores = self.score_text(PROBE_TEXT).map_err(|e| match e {
            SentimentError::Prediction(msg) => SentimentError::ModelLoad(msg),
            other => other,
        })?;

        let labels = self
            .labels
            .take()
            .ok_or_else(|| SentimentError::ModelLoad("no label encoder loaded".into()))?;
        if scores.len() != labels.len() {
            return Err(SentimentError::ModelLoad(format!(
                "model produces {} classes but the label encoder has {} labels",
                scores.len(),
                labels.len()
            )));
        }

        let tokenizer = self
            .tokenizer
            .take()
            .ok_or_else(|| SentimentError::ModelLoad("no tokenizer loaded".into()))?;
        let session = self
            .session
            .take()
            .ok_or_else(|| SentimentError::ModelLoad("no ONNX model loaded".into()))?;
        let device = self
            .device
            .take()
            .ok_or_else(|| SentimentError::ModelLoad("no device bound".into()))?;

        Ok(SentimentClassifier {
            model_path: store.model_path().to_string_lossy().to_string(),
            tokenizer_path: store.tokenizer_path().to_string_lossy().to_string(),
            labels_path: store.labels_path().to_string_lossy().to_string(),
            tokenizer: Arc::new(tokenizer),
            session: Arc::new(session),
            labels: Arc::new(labels),
            device,
            max_sequence_length: self.max_sequence_length.unwrap_or(MAX_SEQUENCE_LENGTH),
        })
    }

    /// Validates that the model has the expected input/output structure.
    fn validate_model(session: &Session) -> Result<(), SentimentError> {
        let inputs = &session.inputs;
        if inputs.len() < 2 {
            return Err(SentimentError::ModelLoad(format!(
                "model must have at least 2 inputs (input_ids and attention_mask), found {}",
                inputs.len()
            )));
        }

        let outputs = &session.outputs;
        if outputs.is_empty() {
            return Err(SentimentError::ModelLoad(
                "model must have at least 1 output for class logits".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_artifacts_fails() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(SentimentError::ModelLoad(_))));
    }

    #[test]
    fn test_missing_artifact_dir_fails_before_any_loading() {
        let result = ClassifierBuilder::new().with_artifact_dir("/tmp/tonality-test/no-such-dir");
        match result {
            Err(SentimentError::ArtifactNotFound(path)) => {
                assert!(path.ends_with("model.onnx"));
            }
            other => panic!("expected ArtifactNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_default_max_sequence_length() {
        let builder = ClassifierBuilder::new();
        assert_eq!(builder.max_sequence_length(), MAX_SEQUENCE_LENGTH);
        let builder = ClassifierBuilder::new().with_max_sequence_length(64);
        assert_eq!(builder.max_sequence_length(), 64);
    }
}
