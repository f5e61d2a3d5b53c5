use crate::core::SentimentError;
use crate::pipelines::SentimentAnalysisPipeline;
use std::sync::Arc;

/// Lifecycle of the served model. There is no transition out of `Ready`, and
/// a failed load leaves the service `Uninitialized` for good.
#[derive(Debug, Clone)]
pub enum ModelState {
    Uninitialized { reason: Option<String> },
    Ready(SentimentAnalysisPipeline),
}

/// Shared handler state, injected into the router at construction.
#[derive(Debug, Clone)]
pub struct AppState {
    model: Arc<ModelState>,
}

impl AppState {
    pub fn ready(pipeline: SentimentAnalysisPipeline) -> Self {
        Self {
            model: Arc::new(ModelState::Ready(pipeline)),
        }
    }

    /// State for a service whose model failed to load (or was never asked to).
    pub fn uninitialized(reason: Option<String>) -> Self {
        Self {
            model: Arc::new(ModelState::Uninitialized { reason }),
        }
    }

    pub fn model_state(&self) -> &ModelState {
        &self.model
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.model, ModelState::Ready(_))
    }

    /// Why the model is unavailable, when a load was attempted and failed.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &*self.model {
            ModelState::Uninitialized { reason } => reason.as_deref(),
            ModelState::Ready(_) => None,
        }
    }

    /// The pipeline, or `ModelUnavailable` while uninitialized.
    pub fn pipeline(&self) -> Result<SentimentAnalysisPipeline, SentimentError> {
        match &*self.model {
            ModelState::Ready(pipeline) => Ok(pipeline.clone()),
            ModelState::Uninitialized { .. } => Err(SentimentError::ModelUnavailable),
        }
    }
}
