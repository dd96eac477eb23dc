use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::collections::HashMap;
use tokenizers::{Encoding, Tokenizer, TruncationDirection};

use super::error::SentimentError;

/// Runs a text through the classification model and exposes its class scores.
///
/// This trait handles the fixed input contract shared by the builder's probe
/// pass and `predict`:
/// 1. Tokenization with special tokens, right-truncated to the bound maximum
///    sequence length (truncation is deterministic and idempotent)
/// 2. Assembly of batch-shaped `[1, len]` input tensors
/// 3. One forward pass producing a `[1, C]` logit row
///
/// The ONNX model is expected to:
/// - Accept two inputs: input_ids and attention_mask (both shape [batch_size, sequence_length])
/// - Output class logits of shape [batch_size, num_classes]
pub(crate) trait TextInference {
    /// Returns the initialized tokenizer if available
    fn tokenizer(&self) -> Option<&Tokenizer>;

    /// Returns the initialized ONNX session if available
    fn session(&self) -> Option<&Session>;

    /// Returns the maximum sequence length fed to the model
    fn max_sequence_length(&self) -> usize;

    /// Counts the number of tokens the text encodes to, before truncation.
    ///
    /// # Errors
    /// - `Prediction` if the tokenizer is not initialized
    /// - `Prediction` if the text cannot be encoded
    fn count_tokens(&self, text: &str) -> Result<usize, SentimentError> {
        let tokenizer = self
            .tokenizer()
            .ok_or_else(|| SentimentError::Prediction("tokenizer not initialized".into()))?;

        tokenizer
            .encode(text, true)
            .map_err(|e| SentimentError::Prediction(format!("tokenization failed: {e}")))
            .map(|encoding| encoding.get_ids().len())
    }

    /// Encodes text under the fixed tokenization policy.
    ///
    /// Inputs longer than the maximum sequence length are truncated on the
    /// right with no warning; shorter inputs pass through unchanged. The
    /// empty string encodes to its special tokens and is not an error.
    fn encode(&self, text: &str) -> Result<Encoding, SentimentError> {
        let tokenizer = self
            .tokenizer()
            .ok_or_else(|| SentimentError::Prediction("tokenizer not initialized".into()))?;

        let mut encoding = tokenizer
            .encode(text, true)
            .map_err(|e| SentimentError::Prediction(format!("tokenization failed: {e}")))?;
        encoding.truncate(self.max_sequence_length(), 0, TruncationDirection::Right);
        Ok(encoding)
    }

    /// Runs the forward pass and returns the logit vector over the class set.
    ///
    /// No learnable parameter is touched; the session is a frozen inference
    /// graph, so repeated calls with the same encoding yield the same scores.
    ///
    /// # Errors
    /// - `Prediction` if the session is not initialized
    /// - `Prediction` if tensor creation, execution or extraction fails
    fn class_scores(&self, encoding: &Encoding) -> Result<Vec<f32>, SentimentError> {
        let session = self
            .session()
            .ok_or_else(|| SentimentError::Prediction("session not initialized".into()))?;

        let len = encoding.get_ids().len();
        let input_array = Array2::from_shape_vec(
            (1, len),
            encoding.get_ids().iter().map(|&id| id as i64).collect(),
        )
        .map_err(|e| SentimentError::Prediction(format!("failed to create input array: {e}")))?;
        let input_dyn = input_array.into_dyn();
        let input_ids = input_dyn.as_standard_layout();

        let mask_array = Array2::from_shape_vec(
            (1, len),
            encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect(),
        )
        .map_err(|e| SentimentError::Prediction(format!("failed to create mask array: {e}")))?;
        let mask_dyn = mask_array.into_dyn();
        let attention_mask = mask_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            "input_ids",
            Tensor::from_array(&input_ids).map_err(|e| {
                SentimentError::Prediction(format!("failed to create input tensor: {e}"))
            })?,
        );
        input_tensors.insert(
            "attention_mask",
            Tensor::from_array(&attention_mask).map_err(|e| {
                SentimentError::Prediction(format!("failed to create mask tensor: {e}"))
            })?,
        );

        let outputs = session
            .run(input_tensors)
            .map_err(|e| SentimentError::Prediction(format!("failed to run model: {e}")))?;
        let logits = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| SentimentError::Prediction(format!("failed to extract logits: {e}")))?;

        let shape = logits.shape();
        if shape.len() != 2 || shape[0] != 1 {
            return Err(SentimentError::Prediction(format!(
                "unexpected logits shape {shape:?}, want [1, num_classes]"
            )));
        }

        Ok(logits.slice(ndarray::s![0, ..]).iter().cloned().collect())
    }

    /// Encodes the text and returns its class scores in one step.
    fn score_text(&self, text: &str) -> Result<Vec<f32>, SentimentError> {
        let encoding = self.encode(text)?;
        self.class_scores(&encoding)
    }
}
