//! Follow-up assistant
//!
//! Answers user questions about an analysed message, grounded in the
//! assessment that was shown to them.

use crate::error::AssistantError;
use crate::gateway::{ChatMessage, ChatRole, CompletionOptions, GatewayClient};
use crate::{Assessment, Language};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Only this many prior turns are forwarded to the model
pub const MAX_HISTORY_TURNS: usize = 10;
const CHAT_TEMPERATURE: f32 = 0.7;
const CHAT_MAX_TOKENS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatSummary {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// What the assistant knows about the analysed message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisContext {
    #[serde(default)]
    pub message_content: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub risk_score: Option<u8>,
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub threats: Vec<ThreatSummary>,
}

impl AnalysisContext {
    pub fn from_assessment(message_content: &str, assessment: &Assessment) -> Self {
        Self {
            message_content: Some(message_content.to_string()),
            risk_level: Some(assessment.risk_level.to_string()),
            risk_score: Some(assessment.risk_score),
            verdict: Some(assessment.verdict.clone()),
            threats: assessment
                .threats
                .iter()
                .map(|t| ThreatSummary {
                    title: t.title.clone(),
                    description: t.description.clone(),
                })
                .collect(),
        }
    }
}

/// A prior exchange; system turns are not accepted from callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

fn language_instruction(language: Language) -> &'static str {
    match language {
        Language::English => "Respond in English. Use simple, clear language that anyone can understand.",
        Language::Hindi => "Respond in Hindi (हिंदी). Use simple language that rural users can understand. Avoid complex technical terms.",
        Language::Telugu => "Respond in Telugu (తెలుగు). Use simple language that rural users can understand. Avoid complex technical terms.",
    }
}

pub fn system_prompt(context: &AnalysisContext, language: Language) -> String {
    let threats = if context.threats.is_empty() {
        "None detected".to_string()
    } else {
        context
            .threats
            .iter()
            .map(|t| t.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let score = context
        .risk_score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "You are a helpful AI assistant specializing in SMS scam detection and cyber safety in India. \
         You help users understand scam analysis results and provide actionable safety advice.\n\
         \n\
         {language}\n\
         \n\
         Context about the analyzed message:\n\
         - Original Message: {message}\n\
         - Risk Level: {level} (Score: {score}/100)\n\
         - Verdict: {verdict}\n\
         - Threats Found: {threats}\n\
         \n\
         Important information to share when relevant:\n\
         - India Cyber Crime Helpline: 1930 (24/7)\n\
         - Report online: cybercrime.gov.in\n\
         - Banks never ask for OTP/PIN via SMS\n\
         - Never click shortened URLs (bit.ly, etc.)\n\
         - Verify suspicious messages by calling official numbers\n\
         \n\
         Keep responses concise (2-4 sentences for simple questions, up to 6 points for action lists).\n\
         Be empathetic and reassuring - many victims feel embarrassed.\n\
         If they've already been scammed, prioritize immediate action steps.",
        language = language_instruction(language),
        message = context.message_content.as_deref().unwrap_or("Not provided"),
        level = context.risk_level.as_deref().unwrap_or("Unknown"),
        score = score,
        verdict = context.verdict.as_deref().unwrap_or("Not analyzed"),
        threats = threats,
    )
}

/// System prompt, the most recent history, then the question
pub fn build_messages(
    question: &str,
    context: &AnalysisContext,
    language: Language,
    history: &[ChatTurn],
) -> Vec<ChatMessage> {
    let recent = &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(ChatMessage::system(system_prompt(context, language)));
    for turn in recent {
        messages.push(ChatMessage {
            role: match turn.role {
                TurnRole::User => ChatRole::User,
                TurnRole::Assistant => ChatRole::Assistant,
            },
            content: turn.content.clone(),
        });
    }
    messages.push(ChatMessage::user(question));
    messages
}

pub struct ChatAssistant {
    gateway: GatewayClient,
}

impl ChatAssistant {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    pub async fn ask(
        &self,
        question: &str,
        context: &AnalysisContext,
        language: Language,
        history: &[ChatTurn],
    ) -> Result<String, AssistantError> {
        if question.trim().is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let messages = build_messages(question, context, language, history);
        info!("Calling AI gateway for chat response ({} turns)", messages.len());

        let reply = self
            .gateway
            .complete(
                &messages,
                CompletionOptions {
                    temperature: CHAT_TEMPERATURE,
                    max_tokens: Some(CHAT_MAX_TOKENS),
                },
            )
            .await?;
        Ok(reply)
    }
}
