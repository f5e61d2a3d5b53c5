use super::scale::ClassProbabilities;
use crate::core::InferenceError;

/// A 7-way sentiment classifier treated as a black box: text in, softmax
/// distribution out.
///
/// Implementations are shared read-only across concurrent requests, so
/// inference must not need `&mut self`.
pub trait SentimentAnalysisModel: Send + Sync {
    /// Tokenizes `text` (truncating long inputs), runs a forward pass and
    /// returns the class probabilities, index 0 being the most negative.
    fn predict_probabilities(&self, text: &str) -> Result<ClassProbabilities, InferenceError>;

    /// Identifier of the loaded weights, e.g. a Hugging Face repo id.
    fn model_id(&self) -> &str;
}
