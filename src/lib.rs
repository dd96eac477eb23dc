//! Sentiment analysis for VK posts and comments, built on ONNX text
//! classification.
//!
//! The core is [`SentimentClassifier`]: it loads a pretrained classifier,
//! tokenizer and label encoder once, binds them to a compute device, and then
//! serves synchronous single-text predictions for the instance's lifetime.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use tonality::SentimentClassifier;
//!
//! let classifier = SentimentClassifier::builder()
//!     .with_artifact_dir("model")?
//!     .build()?;
//!
//! let label = classifier.predict("Отличный фильм, всем советую!")?;
//! println!("sentiment: {label}");
//! # Ok(())
//! # }
//! ```
//!
//! # Analyzing a group wall
//!
//! Construct the classifier once and pass it to every consumer; each `predict`
//! call is independent and a failed item can be skipped without aborting the
//! batch:
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use tonality::{analysis, SentimentClassifier, VkClient};
//!
//! let classifier = SentimentClassifier::builder()
//!     .with_artifact_dir("model")?
//!     .build()?;
//! let vk = VkClient::new(std::env::var("VK_API_TOKEN")?);
//!
//! let posts = vk.get_posts("https://vk.com/themovieblog", 100).await?;
//! let records = analysis::analyze_posts(&classifier, &posts);
//! for (label, count) in analysis::count_by_sentiment(&records) {
//!     println!("{label}: {count}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! All loaded artifacts are read-only after construction and the classifier
//! is `Send + Sync`, but the forward pass is treated as non-reentrant: keep
//! at most one in-flight `predict` per instance and serialize access
//! externally when threads share one.

pub mod analysis;
pub mod artifacts;
pub mod classifier;
pub mod config;
mod runtime;
pub mod vk;

pub use artifacts::ArtifactStore;
pub use classifier::{
    ClassifierBuilder, ClassifierInfo, LabelEncoder, SentimentClassifier, SentimentError,
    MAX_SEQUENCE_LENGTH,
};
pub use config::{AppConfig, ConfigError};
pub use runtime::{create_session_builder, resolve_device, Device, RuntimeConfig};
pub use vk::{Comment, Post, VkClient, VkError};

pub fn init_logger() {
    env_logger::init();
}
