pub mod config;
pub mod error;

pub use config::{ModelConfig, ServiceConfig};
pub use error::{InferenceError, LoadError, Result, SentimentError, ValidationError};
