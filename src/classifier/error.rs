use std::path::PathBuf;

/// The failure kinds surfaced by the sentiment classifier.
///
/// Construction can fail with `ArtifactNotFound` or `ModelLoad`; both abort
/// the instance entirely. `Prediction` is isolated to a single `predict`
/// call, after which the classifier remains usable. There is no retry at any
/// level; callers decide whether to skip or abort.
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    /// A required artifact file is missing at the expected path.
    #[error("artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),
    /// An artifact exists but failed to deserialize or bind to the device.
    #[error("failed to load model: {0}")]
    ModelLoad(String),
    /// A single prediction failed; the classifier stays usable.
    #[error("prediction failed: {0}")]
    Prediction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_not_found_names_the_path() {
        let err = SentimentError::ArtifactNotFound(PathBuf::from("/data/model/model.onnx"));
        assert_eq!(err.to_string(), "artifact not found: /data/model/model.onnx");
    }

    #[test]
    fn test_error_kinds_are_distinguishable() {
        let load = SentimentError::ModelLoad("bad header".into());
        let pred = SentimentError::Prediction("tensor shape".into());
        assert!(load.to_string().starts_with("failed to load model"));
        assert!(pred.to_string().starts_with("prediction failed"));
    }
}
