//! BERT with a 7-way classification head.
//!
//! Mirrors the `BertForSequenceClassification` checkpoint layout: backbone
//! under `bert.*`, a tanh pooler at `bert.pooler.dense`, then `classifier`.

use crate::models::head::{ClassificationHead, HeadActivation, HeadSource};
use candle_core::{Device, Result, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};

pub struct BertClassifier {
    backbone: BertModel,
    head: ClassificationHead,
}

impl BertClassifier {
    pub fn load(
        vb: VarBuilder,
        config: &Config,
        hidden_size: usize,
        head: HeadSource,
        device: &Device,
    ) -> Result<Self> {
        let backbone = BertModel::load(vb.clone(), config)?;
        let pooler = ["bert.pooler.dense", "pooler.dense"]
            .into_iter()
            .find(|prefix| vb.contains_tensor(&format!("{prefix}.weight")));
        let head = match head {
            HeadSource::Checkpoint => ClassificationHead::load(
                vb.pp(pooler.unwrap_or("bert.pooler.dense")),
                vb.pp("classifier"),
                hidden_size,
                HeadActivation::Tanh,
            )?,
            HeadSource::Fresh => ClassificationHead::fresh(
                pooler.map(|prefix| vb.pp(prefix)),
                hidden_size,
                HeadActivation::Tanh,
                device,
            )?,
        };
        Ok(Self { backbone, head })
    }

    /// `input_ids`, `token_type_ids` and `attention_mask` are `(batch, seq)`.
    /// Returns `(batch, 7)` logits.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden_states = self
            .backbone
            .forward(input_ids, token_type_ids, Some(attention_mask))?;
        self.head.forward(&hidden_states)
    }
}
