//! HTTP error mapping

use crate::error::{AssistantError, ClassifierError, GatewayError, SubmissionError};
use crate::Engine;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Analysis not found")]
    NotFound,

    #[error("The {0} engine is not configured on this server")]
    EngineUnavailable(Engine),

    #[error("Chat assistant is not configured on this server")]
    AssistantUnavailable,

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

fn gateway_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        GatewayError::CreditsExhausted => StatusCode::PAYMENT_REQUIRED,
        GatewayError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Submission(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::EngineUnavailable(_) | ApiError::AssistantUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Classifier(ClassifierError::Gateway(e)) => gateway_status(e),
            ApiError::Classifier(ClassifierError::MalformedResponse(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Assistant(AssistantError::EmptyQuestion) => StatusCode::BAD_REQUEST,
            ApiError::Assistant(AssistantError::Gateway(e)) => gateway_status(e),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(SubmissionError::EmptyMessage).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ClassifierError::Gateway(GatewayError::RateLimited)).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::from(AssistantError::Gateway(GatewayError::CreditsExhausted)).status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            ApiError::from(ClassifierError::MalformedResponse("x".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::EngineUnavailable(Engine::Ai).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::EngineUnavailable(Engine::Ai).to_string(),
            "The ai engine is not configured on this server"
        );
        assert_eq!(
            ApiError::from(ClassifierError::Gateway(GatewayError::RateLimited)).to_string(),
            "Rate limit exceeded. Please try again in a moment."
        );
    }
}
