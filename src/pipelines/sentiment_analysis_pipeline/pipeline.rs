use super::model::SentimentAnalysisModel;
use super::scale::SentimentResult;
use crate::core::{Result, SentimentError, ValidationError};
use std::sync::Arc;

pub const MIN_TEXT_CHARS: usize = 1;
pub const MAX_TEXT_CHARS: usize = 5000;
pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 100;

/// Checks a single text; length is counted in characters, not bytes.
pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if (MIN_TEXT_CHARS..=MAX_TEXT_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::TextLength {
            len,
            min: MIN_TEXT_CHARS,
            max: MAX_TEXT_CHARS,
        })
    }
}

/// Checks the batch size, then every text in it.
pub fn validate_batch<S: AsRef<str>>(texts: &[S]) -> Result<(), ValidationError> {
    let len = texts.len();
    if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&len) {
        return Err(ValidationError::BatchSize {
            len,
            min: MIN_BATCH_SIZE,
            max: MAX_BATCH_SIZE,
        });
    }
    for (index, text) in texts.iter().enumerate() {
        validate_text(text.as_ref()).map_err(|_| ValidationError::BatchTextLength {
            index,
            len: text.as_ref().chars().count(),
            min: MIN_TEXT_CHARS,
            max: MAX_TEXT_CHARS,
        })?;
    }
    Ok(())
}

/// A loaded model plus the mapping onto the 7-point scale.
///
/// Cheap to clone; clones share the same model.
#[derive(Clone)]
pub struct SentimentAnalysisPipeline {
    pub(crate) model: Arc<dyn SentimentAnalysisModel>,
}

impl SentimentAnalysisPipeline {
    pub fn new<M: SentimentAnalysisModel + 'static>(model: M) -> Self {
        Self::from_shared(Arc::new(model))
    }

    pub fn from_shared(model: Arc<dyn SentimentAnalysisModel>) -> Self {
        Self { model }
    }

    /// Scores `text` without validating its length.
    pub fn predict(&self, text: &str) -> Result<SentimentResult> {
        let probabilities = self.model.predict_probabilities(text).map_err(|e| {
            tracing::error!(model = self.model_id(), error = %e, "inference failed");
            SentimentError::from(e)
        })?;
        Ok(SentimentResult::from_probabilities(text, probabilities))
    }

    /// Validates `text`, then scores it.
    pub fn analyze(&self, text: &str) -> Result<SentimentResult> {
        validate_text(text)?;
        self.predict(text)
    }

    /// Scores each text in order, one forward pass per text. Stops at the
    /// first failure.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<SentimentResult>> {
        texts.iter().map(|text| self.predict(text.as_ref())).collect()
    }

    /// Validates the batch, then scores it.
    pub fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<SentimentResult>> {
        validate_batch(texts)?;
        self.predict_batch(texts)
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }
}

impl std::fmt::Debug for SentimentAnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAnalysisPipeline")
            .field("model_id", &self.model_id())
            .finish()
    }
}
