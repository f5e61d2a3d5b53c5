//! Sequence-classification head shared by the BERT-family backbones.
//!
//! Both upstream layouts take the first token's hidden state, push it through
//! a square dense layer and an activation, then project onto the classes.

use crate::pipelines::sentiment_analysis_pipeline::scale::NUM_CLASSES;
use candle_core::{DType, Device, IndexOp, Result, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder, VarMap};

/// Where the head weights come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadSource {
    /// The checkpoint ships a trained 7-way head.
    Checkpoint,
    /// Initialize a fresh classifier, keeping the checkpoint's dense layer
    /// when it has one. Predictions are untrained until fine-tuned.
    Fresh,
}

/// Non-linearity between the dense layer and the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadActivation {
    /// DistilBERT's `pre_classifier`.
    Relu,
    /// BERT's pooler.
    Tanh,
}

impl HeadActivation {
    fn apply(self, xs: &Tensor) -> Result<Tensor> {
        match self {
            HeadActivation::Relu => xs.relu(),
            HeadActivation::Tanh => xs.tanh(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassificationHead {
    dense: Linear,
    activation: HeadActivation,
    classifier: Linear,
}

impl ClassificationHead {
    /// Loads `dense` and `classifier` from the given prefixes.
    pub fn load(
        dense_vb: VarBuilder,
        classifier_vb: VarBuilder,
        hidden_size: usize,
        activation: HeadActivation,
    ) -> Result<Self> {
        Ok(Self {
            dense: linear(hidden_size, hidden_size, dense_vb)?,
            activation,
            classifier: linear(hidden_size, NUM_CLASSES, classifier_vb)?,
        })
    }

    /// Builds a head with a randomly initialized classifier on `device`. The
    /// dense layer comes from `dense_vb` when given, otherwise it is random too.
    pub fn fresh(
        dense_vb: Option<VarBuilder>,
        hidden_size: usize,
        activation: HeadActivation,
        device: &Device,
    ) -> Result<Self> {
        let varmap = VarMap::new();
        let init = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let dense = match dense_vb {
            Some(vb) => linear(hidden_size, hidden_size, vb)?,
            None => linear(hidden_size, hidden_size, init.pp("dense"))?,
        };
        Ok(Self {
            dense,
            activation,
            classifier: linear(hidden_size, NUM_CLASSES, init.pp("classifier"))?,
        })
    }

    /// `(batch, seq, hidden)` -> `(batch, NUM_CLASSES)` logits.
    pub fn forward(&self, hidden_states: &Tensor) -> Result<Tensor> {
        let first_token = hidden_states.i((.., 0))?;
        let pooled = self.dense.forward(&first_token)?;
        let pooled = self.activation.apply(&pooled)?;
        self.classifier.forward(&pooled)
    }
}
