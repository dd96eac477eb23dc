use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::error::SentimentError;

/// Bijective mapping between dense class indices and sentiment labels.
///
/// The on-disk form is a JSON array of label strings whose position is the
/// class index, e.g. `["позитив","негатив","нейтрально"]`. The mapping is
/// loaded once and immutable afterwards; `decode` must be total over the
/// index range the model can produce, which the builder checks against the
/// model's logit width at construction.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Builds an encoder from an ordered label vocabulary.
    ///
    /// Fails when the vocabulary is empty or contains duplicates, since the
    /// index↔label mapping must be bijective.
    pub fn from_labels(classes: Vec<String>) -> Result<Self, SentimentError> {
        if classes.is_empty() {
            return Err(SentimentError::ModelLoad(
                "label encoder has an empty vocabulary".into(),
            ));
        }
        let mut seen = HashSet::new();
        for label in &classes {
            if !seen.insert(label.as_str()) {
                return Err(SentimentError::ModelLoad(format!(
                    "label encoder vocabulary contains duplicate label '{label}'"
                )));
            }
        }
        Ok(Self { classes })
    }

    /// Loads the encoder from a `labels.json` artifact.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SentimentError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            SentimentError::ModelLoad(format!("failed to read {}: {e}", path.display()))
        })?;
        let classes: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            SentimentError::ModelLoad(format!("failed to parse {}: {e}", path.display()))
        })?;
        Self::from_labels(classes)
    }

    /// Maps a class index back to its label string.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Number of classes in the vocabulary.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The full label vocabulary in index order.
    pub fn labels(&self) -> &[String] {
        &self.classes
    }
}
