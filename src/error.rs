//! Error types for the classifier, gateway and intake boundaries

use thiserror::Error;

/// Failures talking to the hosted LLM gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("LLM gateway API key is not configured (set SMISH_SENTINEL_API_KEY)")]
    MissingApiKey,

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("AI service temporarily unavailable. Please try again later.")]
    CreditsExhausted,

    #[error("AI gateway error: {status}")]
    Status { status: u16, body: String },

    #[error("AI gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("No content in AI response")]
    EmptyResponse,

    #[error("AI gateway returned an unreadable body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl GatewayError {
    /// Whether a fresh attempt might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport(_) => true,
            GatewayError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Failures producing an assessment from a classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Failed to parse analysis result: {0}")]
    MalformedResponse(String),
}

/// Failures answering a follow-up question
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Question is required")]
    EmptyQuestion,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Rejections of an inbound message submission
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Message content is required")]
    EmptyMessage,

    #[error("Sender phone number is required")]
    EmptySenderPhone,

    #[error("Invalid phone number '{0}': expected + followed by 10-15 digits")]
    InvalidPhone(String),

    #[error("Message is too long ({len} characters, maximum {max})")]
    MessageTooLong { len: usize, max: usize },
}
