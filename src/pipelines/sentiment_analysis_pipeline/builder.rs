use super::pipeline::SentimentAnalysisPipeline;
use crate::core::{LoadError, ModelConfig};
use crate::loaders::ModelAssets;
use crate::models::SequenceClassifier;
use crate::pipelines::utils::DeviceRequest;
use std::path::PathBuf;

/// Builder for a transformer-backed [`SentimentAnalysisPipeline`].
///
/// Start from a model id (or a full [`ModelConfig`]) and chain optional
/// settings:
/// - `.revision(..)`: git revision (branch, tag, commit hash) on the hub.
/// - `.max_length(..)`: token budget before truncation.
/// - `.tokenizer_file(..)`, `.config_file(..)`, `.weight_file(..)`: local
///   overrides that skip the hub.
/// - `.cpu()`, `.cuda_device(..)`, `.device(..)`: device selection.
/// - `.allow_untrained_head(..)`: accept checkpoints without a 7-way head.
///
/// Finally, `.build().await` downloads what is missing and loads the model.
#[derive(Debug, Clone)]
pub struct SentimentAnalysisPipelineBuilder {
    config: ModelConfig,
}

impl SentimentAnalysisPipelineBuilder {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn model_id(model_id: impl Into<String>) -> Self {
        Self::new(ModelConfig {
            model_id: model_id.into(),
            ..ModelConfig::default()
        })
    }

    /// The stock `distilbert-base-uncased` backbone.
    pub fn distilbert() -> Self {
        Self::new(ModelConfig::default())
    }

    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.config.revision = revision.into();
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.config.max_length = max_length;
        self
    }

    pub fn tokenizer_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tokenizer_file = Some(path.into());
        self
    }

    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config_file = Some(path.into());
        self
    }

    pub fn weight_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.weight_file = Some(path.into());
        self
    }

    pub fn allow_untrained_head(mut self, allow: bool) -> Self {
        self.config.allow_untrained_head = allow;
        self
    }

    pub fn cpu(mut self) -> Self {
        self.config.device = DeviceRequest::Cpu;
        self
    }

    pub fn cuda_device(mut self, index: usize) -> Self {
        self.config.device = DeviceRequest::Cuda(index);
        self
    }

    pub fn device(mut self, device: candle_core::Device) -> Self {
        self.config.device = DeviceRequest::Explicit(device);
        self
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub async fn build(self) -> Result<SentimentAnalysisPipeline, LoadError> {
        let ModelConfig {
            model_id,
            device,
            allow_untrained_head,
            ..
        } = self.config.clone();

        tracing::info!(
            model = %model_id,
            revision = %self.config.revision,
            "loading sentiment model"
        );
        let device = device.resolve()?;
        let assets = ModelAssets::load(&self.config).await?;
        let model = SequenceClassifier::load(&model_id, assets, device, allow_untrained_head)?;
        Ok(SentimentAnalysisPipeline::new(model))
    }
}
