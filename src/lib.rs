pub mod core;
pub mod loaders;
pub mod models;
pub mod pipelines;
pub mod server;

// Re-export core types
pub use crate::core::{
    InferenceError, LoadError, ModelConfig, SentimentError, ServiceConfig, ValidationError,
};

// Re-export pipeline types for easier access
pub use pipelines::sentiment_analysis_pipeline::{
    ClassProbabilities, SentimentAnalysisModel, SentimentAnalysisPipeline,
    SentimentAnalysisPipelineBuilder, SentimentResult, SentimentScore,
};
