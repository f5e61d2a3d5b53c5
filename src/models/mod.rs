//! Transformer-backed sentiment classifiers.
//!
//! [`SequenceClassifier`] owns a tokenizer, a backbone from
//! `candle-transformers` and a 7-way head, and implements
//! [`SentimentAnalysisModel`] on top of them.

pub mod head;
pub mod implementations;

use crate::core::{InferenceError, LoadError};
use crate::loaders::{configure_tokenizer, ModelAssets, ModelConfigFile};
use crate::pipelines::sentiment_analysis_pipeline::scale::{ClassProbabilities, NUM_CLASSES};
use crate::pipelines::sentiment_analysis_pipeline::SentimentAnalysisModel;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::VarBuilder;
use head::HeadSource;
use implementations::{BertClassifier, DistilBertClassifier};
use serde::Deserialize;
use std::path::Path;
use tokenizers::{Encoding, Tokenizer};

/// Backbone families the classifier can load, keyed by `model_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    DistilBert,
    Bert,
}

impl Architecture {
    /// Reads `model_type` from a parsed `config.json`. A missing field means
    /// DistilBERT, the default backbone.
    pub fn detect(config: &ModelConfigFile) -> Result<Self, LoadError> {
        match config.metadata.model_type.as_deref() {
            None | Some("distilbert") => Ok(Architecture::DistilBert),
            Some("bert") => Ok(Architecture::Bert),
            Some(other) => Err(LoadError::UnsupportedArchitecture(other.to_string())),
        }
    }
}

/// Decides whether the checkpoint's head can be used as-is.
pub fn resolve_head(
    config: &ModelConfigFile,
    allow_untrained_head: bool,
) -> Result<HeadSource, LoadError> {
    match config.metadata.class_count() {
        Some(NUM_CLASSES) => Ok(HeadSource::Checkpoint),
        _ if allow_untrained_head => Ok(HeadSource::Fresh),
        found => Err(LoadError::ClassCount {
            expected: NUM_CLASSES,
            found: found.unwrap_or(0),
        }),
    }
}

/// Caps truncation at the backbone's position table, so long inputs are cut
/// instead of indexing past it.
pub fn fit_to_positions(
    tokenizer: Tokenizer,
    max_positions: Option<usize>,
) -> Result<Tokenizer, LoadError> {
    let max_length = tokenizer.get_truncation().map(|t| t.max_length);
    match max_positions {
        Some(limit) if max_length.map_or(true, |len| len > limit) => {
            tracing::warn!(
                requested = ?max_length,
                limit,
                "max_length exceeds the model's position embeddings, clamping"
            );
            configure_tokenizer(tokenizer, limit)
        }
        _ => Ok(tokenizer),
    }
}

#[derive(Deserialize)]
struct DistilBertDims {
    dim: usize,
}

#[derive(Deserialize)]
struct BertDims {
    hidden_size: usize,
}

enum Backbone {
    DistilBert(DistilBertClassifier),
    Bert(BertClassifier),
}

pub struct SequenceClassifier {
    model_id: String,
    backbone: Backbone,
    tokenizer: Tokenizer,
    device: Device,
}

impl SequenceClassifier {
    /// Builds the classifier from fetched assets. Fails when the checkpoint
    /// head is not 7 classes wide, unless `allow_untrained_head` is set.
    pub fn load(
        model_id: &str,
        assets: ModelAssets,
        device: Device,
        allow_untrained_head: bool,
    ) -> Result<Self, LoadError> {
        let architecture = Architecture::detect(&assets.config)?;
        let head = resolve_head(&assets.config, allow_untrained_head)?;
        if head == HeadSource::Fresh {
            tracing::warn!(
                model = model_id,
                classes = ?assets.config.metadata.class_count(),
                "checkpoint has no 7-way head, initializing an untrained one"
            );
        }

        let tokenizer = fit_to_positions(
            assets.tokenizer,
            assets.config.metadata.max_position_embeddings,
        )?;

        let vb = weights_var_builder(&assets.weights, &device)?;
        let raw = assets.config.raw.as_str();
        let backbone = match architecture {
            Architecture::DistilBert => {
                let config = serde_json::from_str(raw)?;
                let DistilBertDims { dim } = serde_json::from_str(raw)?;
                Backbone::DistilBert(DistilBertClassifier::load(
                    vb, &config, dim, head, &device,
                )?)
            }
            Architecture::Bert => {
                let config = serde_json::from_str(raw)?;
                let BertDims { hidden_size } = serde_json::from_str(raw)?;
                Backbone::Bert(BertClassifier::load(
                    vb,
                    &config,
                    hidden_size,
                    head,
                    &device,
                )?)
            }
        };

        tracing::info!(
            model = model_id,
            ?architecture,
            device = ?device.location(),
            "sentiment model loaded"
        );

        Ok(Self {
            model_id: model_id.to_string(),
            backbone,
            tokenizer,
            device,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Scores several texts in one forward pass, padded to the longest.
    pub fn predict_batch_probabilities(
        &self,
        texts: &[&str],
    ) -> Result<Vec<ClassProbabilities>, InferenceError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let logits = self.logits(texts)?;
        candle_nn::ops::softmax(&logits, D::Minus1)?
            .to_dtype(DType::F32)?
            .to_vec2::<f32>()?
            .into_iter()
            .map(ClassProbabilities::try_from)
            .collect()
    }

    /// `(batch, NUM_CLASSES)` logits for `texts`.
    fn logits(&self, texts: &[&str]) -> Result<Tensor, InferenceError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| InferenceError::Tokenization(e.to_string()))?;

        let input_ids = stack_rows(&encodings, Encoding::get_ids, &self.device)?;
        let attention_mask = stack_rows(&encodings, Encoding::get_attention_mask, &self.device)?;

        let logits = match &self.backbone {
            Backbone::DistilBert(model) => model.forward(&input_ids, &attention_mask)?,
            Backbone::Bert(model) => {
                let token_type_ids = stack_rows(&encodings, Encoding::get_type_ids, &self.device)?;
                model.forward(&input_ids, &token_type_ids, &attention_mask)?
            }
        };
        Ok(logits)
    }
}

/// Stacks one id field of equally padded encodings into `(batch, seq)`.
fn stack_rows(
    encodings: &[Encoding],
    field: fn(&Encoding) -> &[u32],
    device: &Device,
) -> candle_core::Result<Tensor> {
    let rows = encodings
        .iter()
        .map(|encoding| Tensor::new(field(encoding), device))
        .collect::<candle_core::Result<Vec<_>>>()?;
    Tensor::stack(&rows, 0)
}

impl SentimentAnalysisModel for SequenceClassifier {
    fn predict_probabilities(&self, text: &str) -> Result<ClassProbabilities, InferenceError> {
        let logits = self.logits(&[text])?;
        let probabilities = candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_dtype(DType::F32)?
            .to_vec1::<f32>()?;
        ClassProbabilities::try_from(probabilities)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

fn weights_var_builder(path: &Path, device: &Device) -> Result<VarBuilder<'static>, LoadError> {
    let dtype = DType::F32;
    match path.extension().and_then(|ext| ext.to_str()) {
        // SAFETY: the mmapped file is not modified while the model is alive.
        Some("safetensors") => Ok(unsafe {
            VarBuilder::from_mmaped_safetensors(&[path], dtype, device)?
        }),
        Some("bin") => Ok(VarBuilder::from_pth(path, dtype, device)?),
        _ => Err(LoadError::MissingWeights(format!(
            "unsupported weight file format: {}",
            path.display()
        ))),
    }
}
