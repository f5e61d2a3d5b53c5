use thiserror::Error;

/// Failures while bringing a model up: hub downloads, config parsing, weight
/// loading and the 7-class head guard.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The Hugging Face Hub could not deliver a file.
    #[error("failed to fetch `{filename}` from `{repo}`: {source}")]
    Hub {
        repo: String,
        filename: String,
        #[source]
        source: hf_hub::api::tokio::ApiError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to load tokenizer: {0}")]
    Tokenizer(String),

    /// Neither `model.safetensors` nor `pytorch_model.bin` were usable.
    #[error("model weights not found: {0}")]
    MissingWeights(String),

    /// The token budget cannot hold the tokenizer's special tokens plus text.
    #[error("max_length must be at least {min} tokens, got {requested}")]
    MaxLength { requested: usize, min: usize },

    #[error("unsupported model type `{0}`, expected `distilbert` or `bert`")]
    UnsupportedArchitecture(String),

    /// The checkpoint's classification head does not have 7 outputs.
    #[error("model head has {found} classes, the sentiment scale needs {expected}")]
    ClassCount { expected: usize, found: usize },

    #[error("invalid device `{0}`, expected `auto`, `cpu` or `cuda:N`")]
    Device(String),

    #[error(transparent)]
    Candle(#[from] candle_core::Error),
}

/// Failures inside a single tokenize/forward/softmax pass.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    /// The model produced a distribution that is not 7 entries wide.
    #[error("model returned {found} class probabilities, expected {expected}")]
    ClassCount { expected: usize, found: usize },

    /// The blocking worker running the forward pass died.
    #[error("inference worker failed: {0}")]
    Worker(String),
}

/// Request payloads that fall outside the accepted shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text must be between {min} and {max} characters, got {len}")]
    TextLength { len: usize, min: usize, max: usize },

    #[error("texts[{index}]: text must be between {min} and {max} characters, got {len}")]
    BatchTextLength {
        index: usize,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("texts must contain between {min} and {max} items, got {len}")]
    BatchSize { len: usize, min: usize, max: usize },

    #[error("invalid request body: {0}")]
    Body(String),
}

/// Everything an analysis request can fail with.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model not loaded")]
    ModelUnavailable,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

pub type Result<T, E = SentimentError> = std::result::Result<T, E>;
