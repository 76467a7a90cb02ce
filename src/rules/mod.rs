//! Signal definitions and keyword matching
//!
//! A signal is one independent red flag tested against the lower-cased
//! message text. Each signal fires when any of its trigger substrings is
//! present (OR logic) and contributes a fixed, non-negative weight.

use super::Severity;
use serde::{Deserialize, Serialize};

/// What a signal detects; drives the content-analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Links or shortened URLs
    Link,
    /// Artificial time pressure
    Urgency,
    /// Requests for OTP/PIN/password
    SensitiveRequest,
    /// Prize, lottery and money lures
    MoneyLure,
    /// Anything loaded from a signal file beyond the built-in classes
    Custom,
}

impl Default for SignalKind {
    fn default() -> Self {
        SignalKind::Custom
    }
}

/// A scoring signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// Signal name
    pub name: String,
    #[serde(default)]
    pub kind: SignalKind,
    /// Any of these substrings triggers the signal (case-insensitive)
    #[serde(default)]
    pub any_of: Vec<String>,
    /// Points added to the score when the signal fires
    #[serde(default)]
    pub weight: u8,
    /// Threat entry title
    pub title: String,
    /// Threat entry description
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Signal {
    pub fn new(
        name: impl Into<String>,
        kind: SignalKind,
        any_of: &[&str],
        weight: u8,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            any_of: any_of.iter().map(|s| s.to_string()).collect(),
            weight,
            title: title.into(),
            description: description.into(),
            severity,
            enabled: true,
        }
    }

    /// Trigger literals present in `text_lower`, in declaration order.
    ///
    /// `text_lower` must already be lower-cased.
    pub fn matched_keywords(&self, text_lower: &str) -> Vec<String> {
        if !self.enabled {
            return vec![];
        }
        self.any_of
            .iter()
            .filter(|k| !k.is_empty() && text_lower.contains(&k.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Check if any trigger is present in `text_lower`
    pub fn matches(&self, text_lower: &str) -> bool {
        self.enabled
            && self
                .any_of
                .iter()
                .any(|k| !k.is_empty() && text_lower.contains(&k.to_lowercase()))
    }
}

/// The built-in signal set
pub fn default_signals() -> Vec<Signal> {
    vec![
        Signal::new(
            "suspicious_link",
            SignalKind::Link,
            &["http", "bit.ly", "link"],
            25,
            "Suspicious Link Detected",
            "The message contains a shortened or suspicious URL",
            Severity::High,
        ),
        Signal::new(
            "urgency",
            SignalKind::Urgency,
            &["urgent", "immediate", "expire", "block"],
            20,
            "Urgency Tactics Detected",
            "The message creates artificial time pressure",
            Severity::High,
        ),
        Signal::new(
            "sensitive_request",
            SignalKind::SensitiveRequest,
            &["otp", "pin", "password"],
            25,
            "Information Request (Red Flag)",
            "Asks for sensitive information like OTP/PIN",
            Severity::High,
        ),
        Signal::new(
            "money_lure",
            SignalKind::MoneyLure,
            &["₹", "lakhs", "prize", "won"],
            15,
            "Too-Good-To-Be-True Offer",
            "Promises money or prizes to lure you into responding",
            Severity::Medium,
        ),
    ]
}

/// Load signals from a YAML file
pub fn load_signals_from_file(path: &std::path::Path) -> anyhow::Result<Vec<Signal>> {
    let content = std::fs::read_to_string(path)?;
    let signals: Vec<Signal> = serde_yaml::from_str(&content)?;

    for signal in &signals {
        if signal.any_of.iter().all(|k| k.trim().is_empty()) {
            anyhow::bail!("signal '{}' has no trigger keywords", signal.name);
        }
    }

    Ok(signals)
}
