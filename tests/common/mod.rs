#![allow(dead_code)]

use sentiment_scale::pipelines::sentiment_analysis_pipeline::scale::NUM_CLASSES;
use sentiment_scale::server::{router, AppState};
use sentiment_scale::{ClassProbabilities, InferenceError, SentimentAnalysisModel};
use std::net::SocketAddr;

/// Deterministic stand-in for a transformer: sums per-word weights into a
/// score and puts most of the mass on that class.
pub struct KeywordModel;

const WEIGHTS: &[(&str, i32)] = &[
    ("amazing", 2),
    ("best", 1),
    ("masterpiece", 3),
    ("incredible", 1),
    ("great", 2),
    ("excellent", 2),
    ("enjoyed", 1),
    ("good", 1),
    ("decent", 1),
    ("terrible", -2),
    ("worst", -1),
    ("awful", -2),
    ("waste", -1),
    ("disappointing", -2),
    ("poor", -1),
    ("forgettable", -1),
];

impl KeywordModel {
    pub fn score(text: &str) -> i32 {
        text.split(|c: char| !c.is_alphabetic())
            .map(str::to_lowercase)
            .filter_map(|word| {
                WEIGHTS
                    .iter()
                    .find(|(w, _)| *w == word)
                    .map(|(_, weight)| *weight)
            })
            .sum::<i32>()
            .clamp(-3, 3)
    }
}

impl SentimentAnalysisModel for KeywordModel {
    fn predict_probabilities(&self, text: &str) -> Result<ClassProbabilities, InferenceError> {
        let winner = (Self::score(text) + 3) as usize;
        let mut values = [0.05f32; NUM_CLASSES];
        values[winner] = 0.7;
        Ok(ClassProbabilities::new(values))
    }

    fn model_id(&self) -> &str {
        "test/keyword-model"
    }
}

/// Fails every forward pass.
pub struct BrokenModel;

impl SentimentAnalysisModel for BrokenModel {
    fn predict_probabilities(&self, _text: &str) -> Result<ClassProbabilities, InferenceError> {
        Err(InferenceError::Tokenization("vocabulary missing".into()))
    }

    fn model_id(&self) -> &str {
        "test/broken-model"
    }
}

/// Binds the router to an ephemeral local port and returns its base URL.
pub async fn spawn_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}
