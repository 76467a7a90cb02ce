//! Smish Sentinel Library
//!
//! Core components for scoring received SMS messages for fraud ("smishing") risk.

pub mod analyzer;
pub mod assistant;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod normalizer;
pub mod rules;
pub mod submission;
pub mod web;

use serde::{Deserialize, Serialize};

/// Coarse risk bucket derived from a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Score below 35
    Low,
    /// Score in [35, 65)
    #[default]
    Medium,
    /// Score of 65 and above
    High,
}

impl RiskLevel {
    /// Lower bound (inclusive) of the medium bucket
    pub const MEDIUM_THRESHOLD: u8 = 35;
    /// Lower bound (inclusive) of the high bucket
    pub const HIGH_THRESHOLD: u8 = 65;

    /// Map a score onto its bucket
    pub fn from_score(score: u8) -> Self {
        if score < Self::MEDIUM_THRESHOLD {
            RiskLevel::Low
        } else if score < Self::HIGH_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Case-insensitive parse of `low` / `medium` / `high`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Severity of a single threat indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// One detected red flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatIndicator {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderAnalysis {
    /// Sender label as submitted, never validated here
    pub phone: String,
    pub in_contacts: bool,
    pub report_count: u32,
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub has_links: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_domain: Option<String>,
    pub has_urgency: bool,
    /// 1 (poor) to 10 (clean)
    pub grammar_score: u8,
    /// Trigger words found in the message; order carries no meaning
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(rename = "do")]
    pub dos: Vec<String>,
    #[serde(rename = "dont")]
    pub donts: Vec<String>,
}

/// Structured result of scoring one message.
///
/// Produced fresh by every scoring or normalization call and never mutated
/// afterwards. Both the local heuristic and the remote classifier path yield
/// this same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Always within [0, 100]
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    /// Always within [0, 100]
    pub confidence: u8,
    pub verdict: String,
    pub action: String,
    pub threats: Vec<ThreatIndicator>,
    pub sender_analysis: SenderAnalysis,
    pub content_analysis: ContentAnalysis,
    pub recommendations: Recommendations,
}

/// Language the remote classifier and assistant answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::English => write!(f, "english"),
            Language::Hindi => write!(f, "hindi"),
            Language::Telugu => write!(f, "telugu"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "hindi" | "hi" => Ok(Language::Hindi),
            "telugu" | "te" => Ok(Language::Telugu),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

/// Which classifier produces an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Local keyword heuristic
    #[default]
    Heuristic,
    /// Remote LLM gateway
    Ai,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Heuristic => write!(f, "heuristic"),
            Engine::Ai => write!(f, "ai"),
        }
    }
}
