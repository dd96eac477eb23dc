mod classifier;
mod error;
mod inference;
mod labels;
mod utils;
pub mod builder;

pub use builder::{ClassifierBuilder, MAX_SEQUENCE_LENGTH};
pub use classifier::SentimentClassifier;
pub use error::SentimentError;
pub use labels::LabelEncoder;

use crate::runtime::Device;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Path to the tokenizer file
    pub tokenizer_path: String,
    /// Path to the label encoder file
    pub labels_path: String,
    /// Number of classes in the label vocabulary
    pub num_classes: usize,
    /// The label vocabulary in index order
    pub labels: Vec<String>,
    /// The compute device the session is bound to
    pub device: Device,
    /// Maximum sequence length fed to the model
    pub max_sequence_length: usize,
}
