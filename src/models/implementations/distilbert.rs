//! DistilBERT with a 7-way classification head.
//!
//! Mirrors the `DistilBertForSequenceClassification` checkpoint layout:
//! backbone under `distilbert.*`, then `pre_classifier` and `classifier`.

use crate::models::head::{ClassificationHead, HeadActivation, HeadSource};
use candle_core::{Device, Result, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::distilbert::{Config, DistilBertModel};

pub struct DistilBertClassifier {
    backbone: DistilBertModel,
    head: ClassificationHead,
}

impl DistilBertClassifier {
    pub fn load(
        vb: VarBuilder,
        config: &Config,
        hidden_size: usize,
        head: HeadSource,
        device: &Device,
    ) -> Result<Self> {
        let backbone = DistilBertModel::load(vb.clone(), config)?;
        let head = match head {
            HeadSource::Checkpoint => ClassificationHead::load(
                vb.pp("pre_classifier"),
                vb.pp("classifier"),
                hidden_size,
                HeadActivation::Relu,
            )?,
            HeadSource::Fresh => {
                let dense = vb
                    .contains_tensor("pre_classifier.weight")
                    .then(|| vb.pp("pre_classifier"));
                ClassificationHead::fresh(dense, hidden_size, HeadActivation::Relu, device)?
            }
        };
        Ok(Self { backbone, head })
    }

    /// `input_ids` and `attention_mask` are `(batch, seq)`; the mask uses 1
    /// for real tokens and 0 for padding. Returns `(batch, 7)` logits.
    pub fn forward(&self, input_ids: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        // The backbone masks score positions where its mask is 1, so padding
        // becomes 1 and real tokens 0, shaped to broadcast over heads and queries.
        let (batch, seq_len) = attention_mask.dims2()?;
        let padding = attention_mask.eq(0u32)?.reshape((batch, 1, 1, seq_len))?;
        let hidden_states = self.backbone.forward(input_ids, &padding)?;
        self.head.forward(&hidden_states)
    }
}
