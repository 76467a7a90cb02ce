//! Heuristic message analyzer
//!
//! Tests a message against the configured signals and produces an
//! [`Assessment`]. Scoring is purely additive: a base score, plus the weight
//! of every signal that fires, plus an optional unknown-sender penalty,
//! clamped to 100.

pub mod risk_scorer;

use self::risk_scorer::{
    action_for, extract_link_domain, recommendations_for, verdict_for, PlaceholderMetrics,
    NEW_SENDER_SCORE_THRESHOLD,
};
use super::rules::{default_signals, Signal, SignalKind};
use super::{Assessment, ContentAnalysis, RiskLevel, SenderAnalysis, Severity, ThreatIndicator};
use tracing::debug;

pub const MAX_SCORE: u8 = 100;

/// Tunables for [`RiskScorer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorerOptions {
    /// Score every message starts from
    pub base_score: u8,
    /// Add [`UNKNOWN_SENDER_PENALTY`] and a threat entry when the sender is not a contact
    pub unknown_sender_penalty: bool,
}

pub const DEFAULT_BASE_SCORE: u8 = 20;
pub const UNKNOWN_SENDER_PENALTY: u8 = 10;

impl Default for ScorerOptions {
    fn default() -> Self {
        Self {
            base_score: DEFAULT_BASE_SCORE,
            unknown_sender_penalty: true,
        }
    }
}

/// Deterministic keyword-based scorer
#[derive(Debug, Clone)]
pub struct RiskScorer {
    signals: Vec<Signal>,
    options: ScorerOptions,
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(default_signals(), ScorerOptions::default())
    }
}

impl RiskScorer {
    pub fn new(signals: Vec<Signal>, options: ScorerOptions) -> Self {
        Self { signals, options }
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Score a message.
    ///
    /// Empty text is a valid degenerate case: no signal fires and the score
    /// stays at the base (plus the unknown-sender penalty when enabled).
    pub fn score(&self, message_text: &str, sender_phone: &str, sender_in_contacts: bool) -> Assessment {
        let text_lower = message_text.to_lowercase();

        let mut total = u32::from(self.options.base_score);
        let mut threats = Vec::new();
        let mut keywords: Vec<String> = Vec::new();
        let mut has_links = false;
        let mut has_urgency = false;

        for signal in &self.signals {
            let matched = signal.matched_keywords(&text_lower);
            if matched.is_empty() {
                continue;
            }

            total += u32::from(signal.weight);
            match signal.kind {
                SignalKind::Link => has_links = true,
                SignalKind::Urgency => has_urgency = true,
                _ => {}
            }

            threats.push(ThreatIndicator {
                title: signal.title.clone(),
                description: signal.description.clone(),
                severity: signal.severity,
            });

            for keyword in matched {
                if !keywords.contains(&keyword) {
                    keywords.push(keyword);
                }
            }
        }

        if self.options.unknown_sender_penalty && !sender_in_contacts {
            total += u32::from(UNKNOWN_SENDER_PENALTY);
            threats.push(ThreatIndicator {
                title: "Unknown Sender".to_string(),
                description: "Number not in your contacts".to_string(),
                severity: Severity::Medium,
            });
        }

        let risk_score = total.min(u32::from(MAX_SCORE)) as u8;
        let risk_level = RiskLevel::from_score(risk_score);
        let placeholders = PlaceholderMetrics::derive(message_text, sender_phone, risk_score);

        debug!(
            "Scored message: score={} level={} threats={}",
            risk_score,
            risk_level,
            threats.len()
        );

        Assessment {
            risk_score,
            risk_level,
            confidence: placeholders.confidence,
            verdict: verdict_for(risk_level).to_string(),
            action: action_for(risk_level).to_string(),
            threats,
            sender_analysis: SenderAnalysis {
                phone: sender_phone.to_string(),
                in_contacts: sender_in_contacts,
                report_count: placeholders.report_count,
                is_new: risk_score > NEW_SENDER_SCORE_THRESHOLD,
            },
            content_analysis: ContentAnalysis {
                has_links,
                link_domain: if has_links {
                    extract_link_domain(message_text)
                } else {
                    None
                },
                has_urgency,
                grammar_score: placeholders.grammar_score,
                keywords,
            },
            recommendations: recommendations_for(risk_level, risk_score),
        }
    }
}
