use ort::session::Session;
use std::sync::Arc;
use tokenizers::Tokenizer;

use super::error::SentimentError;
use super::inference::TextInference;
use super::labels::LabelEncoder;
use super::utils::argmax;
use crate::runtime::Device;

/// A sentiment classifier over a fixed label vocabulary.
///
/// Constructed once via [`builder`](Self::builder); afterwards the tokenizer,
/// session, label encoder and device binding are immutable and shared
/// read-only by every call, so `predict` is a pure function of its input for
/// fixed weights. The forward pass itself is not guaranteed reentrant; keep
/// at most one in-flight `predict` per instance and serialize externally if
/// several threads share one.
///
/// ```rust,no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use tonality::SentimentClassifier;
///
/// let classifier = SentimentClassifier::builder()
///     .with_artifact_dir("model")?
///     .build()?;
///
/// let label = classifier.predict("Отличный фильм, всем советую!")?;
/// println!("sentiment: {label}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SentimentClassifier {
    pub(crate) model_path: String,
    pub(crate) tokenizer_path: String,
    pub(crate) labels_path: String,
    pub(crate) tokenizer: Arc<Tokenizer>,
    pub(crate) session: Arc<Session>,
    pub(crate) labels: Arc<LabelEncoder>,
    pub(crate) device: Device,
    pub(crate) max_sequence_length: usize,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<SentimentClassifier>();
    }
};

impl TextInference for SentimentClassifier {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        Some(&self.tokenizer)
    }

    fn session(&self) -> Option<&Session> {
        Some(&self.session)
    }

    fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }
}

impl SentimentClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            labels_path: self.labels_path.clone(),
            num_classes: self.labels.len(),
            labels: self.labels.labels().to_vec(),
            device: self.device,
            max_sequence_length: self.max_sequence_length,
        }
    }

    /// The label vocabulary every prediction is drawn from.
    pub fn labels(&self) -> &[String] {
        self.labels.labels()
    }

    /// The compute device the model is bound to.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Predicts the sentiment label of the input text.
    ///
    /// Accepts any string, the empty string included; inputs longer than the
    /// bound maximum sequence length are deterministically truncated. Exactly
    /// one label from the fixed vocabulary is returned per call, with no
    /// scores and no multi-label results.
    ///
    /// Any failure during tokenization or the forward pass surfaces as
    /// [`SentimentError::Prediction`]; the classifier remains Ready and the
    /// next call is unaffected. There are no retries here, and skipping a
    /// failed item is the caller's decision.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use tonality::SentimentClassifier;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let classifier = SentimentClassifier::builder().with_artifact_dir("model")?.build()?;
    /// let label = classifier.predict("Ну и дела...")?;
    /// assert!(classifier.labels().iter().any(|l| l == &label));
    /// # Ok(())
    /// # }
    /// ```
    pub fn predict(&self, text: &str) -> Result<String, SentimentError> {
        let scores = self.score_text(text)?;

        let class_id = argmax(&scores)
            .ok_or_else(|| SentimentError::Prediction("model returned no class scores".into()))?;

        // A decode miss means the artifact pair violated the class-count
        // invariant checked at build time; surface it, don't mask it.
        self.labels
            .decode(class_id)
            .map(str::to_string)
            .ok_or_else(|| {
                SentimentError::Prediction(format!(
                    "class index {class_id} is outside the label vocabulary ({} labels)",
                    self.labels.len()
                ))
            })
    }
}
