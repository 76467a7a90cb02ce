//! Swappable message classifiers
//!
//! Both implementations yield the shared [`Assessment`] contract: the local
//! heuristic directly, the remote gateway through the normalizer.

pub mod prompt;

use crate::analyzer::RiskScorer;
use crate::error::ClassifierError;
use crate::gateway::{ChatMessage, CompletionOptions, GatewayClient};
use crate::normalizer::{parse_classifier_output, AssessmentNormalizer};
use crate::{Assessment, Language};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

const CLASSIFY_TEMPERATURE: f32 = 0.3;

/// One message to classify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub message_text: String,
    pub sender_phone: String,
    #[serde(default)]
    pub sender_in_contacts: bool,
    #[serde(default)]
    pub language: Language,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn classify(&self, request: &ClassifyRequest) -> Result<Assessment, ClassifierError>;
}

/// Local keyword heuristic; never fails
pub struct HeuristicClassifier {
    scorer: RiskScorer,
}

impl HeuristicClassifier {
    pub fn new(scorer: RiskScorer) -> Self {
        Self { scorer }
    }
}

#[async_trait]
impl Classifier for HeuristicClassifier {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn classify(&self, request: &ClassifyRequest) -> Result<Assessment, ClassifierError> {
        Ok(self.scorer.score(
            &request.message_text,
            &request.sender_phone,
            request.sender_in_contacts,
        ))
    }
}

/// Remote LLM classifier behind the hosted gateway
pub struct GatewayClassifier {
    gateway: GatewayClient,
    normalizer: AssessmentNormalizer,
}

impl GatewayClassifier {
    pub fn new(gateway: GatewayClient, normalizer: AssessmentNormalizer) -> Self {
        Self {
            gateway,
            normalizer,
        }
    }

    pub fn build_messages(request: &ClassifyRequest) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(prompt::system_prompt(request.language)),
            ChatMessage::user(prompt::user_prompt(
                &request.message_text,
                &request.sender_phone,
            )),
        ]
    }
}

#[async_trait]
impl Classifier for GatewayClassifier {
    fn name(&self) -> &'static str {
        "ai"
    }

    async fn classify(&self, request: &ClassifyRequest) -> Result<Assessment, ClassifierError> {
        let messages = Self::build_messages(request);
        let content = self
            .gateway
            .complete(
                &messages,
                CompletionOptions {
                    temperature: CLASSIFY_TEMPERATURE,
                    max_tokens: None,
                },
            )
            .await?;

        let raw = parse_classifier_output(&content)?;
        let assessment = self.normalizer.normalize(&raw, &request.sender_phone);
        info!(
            "Remote classification via {}: score={} level={}",
            self.gateway.model(),
            assessment.risk_score,
            assessment.risk_level
        );
        Ok(assessment)
    }
}
