use crate::core::{SentimentError, ValidationError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// Maps an analysis failure onto a status; `context` prefixes the detail
    /// of inference failures.
    pub fn from_sentiment(err: SentimentError, context: &str) -> Self {
        match err {
            SentimentError::Validation(e) => e.into(),
            SentimentError::ModelUnavailable => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                SentimentError::ModelUnavailable.to_string(),
            ),
            SentimentError::Inference(e) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("{context}: {e}"))
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::Body(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InferenceError;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let validation = ApiError::from_sentiment(
            ValidationError::BatchSize {
                len: 101,
                min: 1,
                max: 100,
            }
            .into(),
            "Error analyzing batch",
        );
        assert_eq!(validation.status, StatusCode::UNPROCESSABLE_ENTITY);

        let unavailable = ApiError::from_sentiment(SentimentError::ModelUnavailable, "x");
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(unavailable.detail, "Model not loaded");

        let inference = ApiError::from_sentiment(
            InferenceError::Tokenization("bad input".into()).into(),
            "Error analyzing text",
        );
        assert_eq!(inference.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            inference.detail,
            "Error analyzing text: tokenization failed: bad input"
        );
    }
}
