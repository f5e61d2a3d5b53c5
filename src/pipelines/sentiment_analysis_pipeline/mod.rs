//! Sentiment analysis on a 7-point scale (-3 to +3).
//!
//! ## Main Types
//!
//! - [`SentimentAnalysisPipeline`] - validates input, runs the model and maps
//!   the output onto the scale
//! - [`SentimentAnalysisPipelineBuilder`] - loads a transformer classifier
//!   from the Hugging Face Hub or local files
//! - [`SentimentAnalysisModel`] - the black-box model seam
//! - [`SentimentResult`] - score, label, emoji, confidence and the full
//!   distribution
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sentiment_scale::pipelines::sentiment_analysis_pipeline::*;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::model_id("someone/distilbert-7-class")
//!     .cpu()
//!     .build()
//!     .await?;
//!
//! let result = pipeline.analyze("Absolutely amazing! Best movie I've seen this year!")?;
//! println!("{} {} ({:.1}%)", result.sentiment_label, result.emoji, result.confidence * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod model;
pub mod pipeline;
pub mod scale;

pub use builder::SentimentAnalysisPipelineBuilder;
pub use model::SentimentAnalysisModel;
pub use pipeline::{validate_batch, validate_text, SentimentAnalysisPipeline};
pub use scale::{sentiment_scale, ClassProbabilities, ScaleEntry, SentimentResult, SentimentScore};
