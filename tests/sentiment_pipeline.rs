// Integration tests for the sentiment analysis pipeline's public API.

mod common;

use common::{BrokenModel, KeywordModel};
use sentiment_scale::pipelines::sentiment_analysis_pipeline::*;
use sentiment_scale::{SentimentError, ValidationError};

#[test]
fn scores_the_reference_review_as_very_positive() -> anyhow::Result<()> {
    let pipeline = SentimentAnalysisPipeline::new(KeywordModel);
    let result = pipeline.analyze("Absolutely amazing! Best movie I've seen this year!")?;
    assert_eq!(result.sentiment_score, 3);
    assert_eq!(result.sentiment_label, "Very Positive");
    assert_eq!(result.emoji, "🤩");
    assert_eq!(result.text, "Absolutely amazing! Best movie I've seen this year!");
    Ok(())
}

#[test]
fn results_respect_the_scale_invariants() -> anyhow::Result<()> {
    let pipeline = SentimentAnalysisPipeline::new(KeywordModel);
    let texts = [
        "This movie was absolutely terrible! Worst film I've ever seen.",
        "Very disappointing. Poor acting and weak plot.",
        "It was okay. Nothing particularly special.",
        "Really great movie! Thoroughly enjoyed it.",
        "Masterpiece! Incredible in every way!",
    ];
    for text in texts {
        let result = pipeline.analyze(text)?;
        assert!((-3..=3).contains(&result.sentiment_score));

        let probabilities = result.probabilities.as_array();
        assert_eq!(probabilities.len(), 7);
        let total: f32 = probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-6, "{text}: sums to {total}");

        let max = probabilities.iter().cloned().fold(f32::MIN, f32::max);
        assert_eq!(result.confidence, max);

        let score = result.score().expect("score on the scale");
        assert_eq!(result.sentiment_label, score.label());
        assert_eq!(result.emoji, score.emoji());
    }
    Ok(())
}

#[test]
fn batch_matches_single_analysis_in_order() -> anyhow::Result<()> {
    let pipeline = SentimentAnalysisPipeline::new(KeywordModel);
    let texts: Vec<String> = [
        "Complete waste of time and money. Awful in every way.",
        "Average film. Neither good nor bad.",
        "Excellent film with strong performances.",
        "Complete waste of time and money. Awful in every way.",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect();

    let batch = pipeline.analyze_batch(&texts)?;
    assert_eq!(batch.len(), texts.len());
    for (text, result) in texts.iter().zip(&batch) {
        assert_eq!(&result.text, text);
        assert_eq!(result, &pipeline.analyze(text)?);
    }
    assert_eq!(batch[0], batch[3]);
    Ok(())
}

#[test]
fn rejects_out_of_range_inputs() {
    let pipeline = SentimentAnalysisPipeline::new(KeywordModel);

    assert!(matches!(
        pipeline.analyze(""),
        Err(SentimentError::Validation(ValidationError::TextLength { len: 0, .. }))
    ));
    assert!(matches!(
        pipeline.analyze(&"x".repeat(5001)),
        Err(SentimentError::Validation(ValidationError::TextLength { len: 5001, .. }))
    ));
    assert!(pipeline.analyze(&"x".repeat(5000)).is_ok());

    let too_many = vec!["fine".to_string(); 101];
    assert!(matches!(
        pipeline.analyze_batch(&too_many),
        Err(SentimentError::Validation(ValidationError::BatchSize { len: 101, .. }))
    ));
}

#[test]
fn inference_failures_surface_as_inference_errors() {
    let pipeline = SentimentAnalysisPipeline::new(BrokenModel);
    let err = pipeline.analyze("anything").unwrap_err();
    assert!(matches!(err, SentimentError::Inference(_)));
    assert_eq!(pipeline.model_id(), "test/broken-model");
}

#[test]
fn clones_share_the_model() {
    let pipeline = SentimentAnalysisPipeline::new(KeywordModel);
    let clone = pipeline.clone();
    assert_eq!(clone.model_id(), pipeline.model_id());
    assert_eq!(
        clone.analyze("good").unwrap(),
        pipeline.analyze("good").unwrap()
    );
}
