//! Fixed templates and derived values for heuristic assessments

use crate::{Recommendations, RiskLevel};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Scores above this earn a "report to your bank" recommendation and a non-zero report count
pub const REPORT_SCORE_THRESHOLD: u8 = 50;
/// Scores above this mark the sender as new
pub const NEW_SENDER_SCORE_THRESHOLD: u8 = 60;

pub fn verdict_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "This message is likely a smishing attempt",
        RiskLevel::Medium => "This message shows some suspicious characteristics",
        RiskLevel::Low => "This message appears to be legitimate",
    }
}

pub fn action_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "Do NOT click links or share personal information",
        RiskLevel::Medium => "Verify the sender through official channels before responding",
        RiskLevel::Low => "Safe to proceed, but always stay vigilant",
    }
}

pub fn recommendations_for(level: RiskLevel, score: u8) -> Recommendations {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    match level {
        RiskLevel::Low => Recommendations {
            dos: owned(&[
                "Keep this for your records",
                "Verify unexpected requests through official channels",
            ]),
            donts: owned(&[
                "Don't share OTPs, passwords, or PINs",
                "Don't click links you were not expecting",
            ]),
        },
        RiskLevel::Medium | RiskLevel::High => {
            let report = if score > REPORT_SCORE_THRESHOLD {
                "Report to your bank (if impersonating)"
            } else {
                "Keep this for your records"
            };
            Recommendations {
                dos: owned(&[
                    "Delete this message immediately",
                    "Block the sender number on your phone",
                    report,
                    "Inform 3 friends/family about this scam",
                    "Check your bank account for unauthorized activity",
                ]),
                donts: owned(&[
                    "Don't click any links in the message",
                    "Don't call the number back",
                    "Don't share OTPs, passwords, or PINs",
                    "Don't forward message without warning others",
                    "Don't respond to the sender",
                ]),
            }
        }
    }
}

/// Values with no real data source behind them, derived from the message fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderMetrics {
    /// In [85, 94]
    pub confidence: u8,
    /// 0, or in [10, 59] when the score exceeds the report threshold
    pub report_count: u32,
    /// In [6, 9]
    pub grammar_score: u8,
}

impl PlaceholderMetrics {
    pub fn derive(message_text: &str, sender_phone: &str, score: u8) -> Self {
        let digest = fingerprint(message_text, sender_phone);
        Self {
            confidence: 85 + digest[0] % 10,
            report_count: if score > REPORT_SCORE_THRESHOLD {
                10 + u32::from(digest[1] % 50)
            } else {
                0
            },
            grammar_score: 6 + digest[2] % 4,
        }
    }
}

/// SHA-256 over the message and sender, separated so the pair is unambiguous
pub fn fingerprint(message_text: &str, sender_phone: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(message_text.as_bytes());
    hasher.update([0u8]);
    hasher.update(sender_phone.as_bytes());
    hasher.finalize().into()
}

fn scheme_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)https?://([a-z0-9.-]+)").expect("valid url regex"))
}

fn bare_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b((?:[a-z0-9-]+\.)+[a-z]{2,})/").expect("valid bare url regex")
    })
}

/// Host of the first URL in `text`, lower-cased
pub fn extract_link_domain(text: &str) -> Option<String> {
    let host = scheme_url_regex()
        .captures(text)
        .or_else(|| bare_url_regex().captures(text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim_end_matches('.').to_lowercase())?;

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
