//! Assessment normalizer
//!
//! Rebuilds a valid [`Assessment`] from whatever an external classifier
//! returned. Every field is coerced, clamped or defaulted on its own; one
//! bad field never invalidates the rest.

use crate::error::ClassifierError;
use crate::{
    Assessment, ContentAnalysis, Recommendations, RiskLevel, SenderAnalysis, Severity,
    ThreatIndicator,
};
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_RISK_SCORE: u8 = 50;
pub const DEFAULT_CONFIDENCE: u8 = 80;
pub const DEFAULT_GRAMMAR_SCORE: u8 = 5;
pub const DEFAULT_VERDICT: &str = "Unable to determine message safety";
pub const DEFAULT_ACTION: &str = "Exercise caution with this message";
pub const DEFAULT_DO: &str = "Be cautious with this message";
pub const DEFAULT_DONT: &str = "Do not share personal information";
const UNTITLED_THREAT: &str = "Unspecified threat";

/// Field-by-field repair of classifier output
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessmentNormalizer {
    reconcile_level: bool,
}

impl AssessmentNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive the risk level from the normalized score instead of trusting
    /// the classifier's own label
    pub fn with_level_reconciliation(mut self, enabled: bool) -> Self {
        self.reconcile_level = enabled;
        self
    }

    /// Normalize `raw` into an assessment.
    ///
    /// `senderAnalysis.phone` always becomes `fallback_sender_phone` and
    /// `senderAnalysis.inContacts` is always false. A non-object `raw` yields
    /// an all-defaults assessment.
    pub fn normalize(&self, raw: &Value, fallback_sender_phone: &str) -> Assessment {
        let risk_score = number_field(raw.get("riskScore"))
            .map(|n| clamp_round(n, 0, 100) as u8)
            .unwrap_or(DEFAULT_RISK_SCORE);

        let claimed_level = raw
            .get("riskLevel")
            .and_then(Value::as_str)
            .and_then(RiskLevel::parse);
        let risk_level = if self.reconcile_level {
            RiskLevel::from_score(risk_score)
        } else {
            claimed_level.unwrap_or_default()
        };
        if claimed_level.is_some_and(|l| l != RiskLevel::from_score(risk_score)) {
            debug!(
                "Classifier level {:?} disagrees with score {}",
                claimed_level, risk_score
            );
        }

        let confidence = number_field(raw.get("confidence"))
            .map(|n| clamp_round(n, 0, 100) as u8)
            .unwrap_or(DEFAULT_CONFIDENCE);

        let sender = raw.get("senderAnalysis");
        let content = raw.get("contentAnalysis");
        let recommendations = raw.get("recommendations");

        Assessment {
            risk_score,
            risk_level,
            confidence,
            verdict: text_field(raw.get("verdict")).unwrap_or_else(|| DEFAULT_VERDICT.to_string()),
            action: text_field(raw.get("action")).unwrap_or_else(|| DEFAULT_ACTION.to_string()),
            threats: raw
                .get("threats")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(threat_from).collect())
                .unwrap_or_default(),
            sender_analysis: SenderAnalysis {
                phone: fallback_sender_phone.to_string(),
                in_contacts: false,
                report_count: number_field(sender.and_then(|s| s.get("reportCount")))
                    .map(|n| clamp_round(n, 0, u32::MAX as i64) as u32)
                    .unwrap_or(0),
                is_new: truthy(sender.and_then(|s| s.get("isNew"))),
            },
            content_analysis: ContentAnalysis {
                has_links: truthy(content.and_then(|c| c.get("hasLinks"))),
                link_domain: text_field(content.and_then(|c| c.get("linkDomain"))),
                has_urgency: truthy(content.and_then(|c| c.get("hasUrgency"))),
                grammar_score: number_field(content.and_then(|c| c.get("grammarScore")))
                    .map(|n| clamp_round(n, 1, 10) as u8)
                    .unwrap_or(DEFAULT_GRAMMAR_SCORE),
                keywords: string_list(content.and_then(|c| c.get("keywords"))).unwrap_or_default(),
            },
            recommendations: Recommendations {
                dos: string_list(recommendations.and_then(|r| r.get("do")))
                    .unwrap_or_else(|| vec![DEFAULT_DO.to_string()]),
                donts: string_list(recommendations.and_then(|r| r.get("dont")))
                    .unwrap_or_else(|| vec![DEFAULT_DONT.to_string()]),
            },
        }
    }
}

/// Normalize with the default (non-reconciling) normalizer
pub fn normalize(raw: &Value, fallback_sender_phone: &str) -> Assessment {
    AssessmentNormalizer::new().normalize(raw, fallback_sender_phone)
}

/// Parse a model's text reply into a JSON object.
///
/// Tolerates a surrounding markdown code fence. Anything that is not a JSON
/// object is a malformed response.
pub fn parse_classifier_output(content: &str) -> Result<Value, ClassifierError> {
    let mut clean = content.trim();
    if let Some(rest) = clean.strip_prefix("```json") {
        clean = rest;
    } else if let Some(rest) = clean.strip_prefix("```") {
        clean = rest;
    }
    if let Some(rest) = clean.strip_suffix("```") {
        clean = rest;
    }
    let clean = clean.trim();

    let value: Value = serde_json::from_str(clean).map_err(|e| {
        warn!("Failed to parse classifier output: {}", e);
        ClassifierError::MalformedResponse(e.to_string())
    })?;

    if !value.is_object() {
        return Err(ClassifierError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    }

    Ok(value)
}

/// Finite number from a JSON number or a numeric string
fn number_field(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn clamp_round(n: f64, min: i64, max: i64) -> i64 {
    (n.round() as i64).clamp(min, max)
}

/// Non-empty string
fn text_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Loose boolean coercion: `true`, non-zero numbers, `"true"`/`"yes"`,
/// non-empty arrays and objects
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "yes" | "1"
        ),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// String elements of an array; `None` when the value is not an array
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn threat_from(value: &Value) -> Option<ThreatIndicator> {
    match value {
        Value::Object(_) => Some(ThreatIndicator {
            title: text_field(value.get("title")).unwrap_or_else(|| UNTITLED_THREAT.to_string()),
            description: text_field(value.get("description")).unwrap_or_default(),
            severity: value
                .get("severity")
                .and_then(Value::as_str)
                .and_then(Severity::parse)
                .unwrap_or_default(),
        }),
        Value::String(s) if !s.trim().is_empty() => Some(ThreatIndicator {
            title: s.clone(),
            description: String::new(),
            severity: Severity::Medium,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamps_and_defaults() {
        let raw = json!({ "riskScore": 150, "riskLevel": "critical", "threats": "not-a-list" });
        let a = normalize(&raw, "+911111111111");

        assert_eq!(a.risk_score, 100);
        assert_eq!(a.risk_level, RiskLevel::Medium);
        assert!(a.threats.is_empty());
        assert_eq!(a.sender_analysis.phone, "+911111111111");
        assert_eq!(a.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(a.verdict, DEFAULT_VERDICT);
        assert_eq!(a.action, DEFAULT_ACTION);
        assert_eq!(a.recommendations.dos, vec![DEFAULT_DO.to_string()]);
        assert_eq!(a.recommendations.donts, vec![DEFAULT_DONT.to_string()]);
    }

    #[test]
    fn test_wrong_types_degrade_to_defaults() {
        let raw = json!({
            "riskScore": "abc",
            "confidence": null,
            "verdict": 42,
            "threats": null,
            "senderAnalysis": "nope",
            "contentAnalysis": { "grammarScore": -3, "keywords": "otp" },
            "recommendations": {}
        });
        let a = normalize(&raw, "+912222222222");

        assert_eq!(a.risk_score, DEFAULT_RISK_SCORE);
        assert_eq!(a.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(a.verdict, DEFAULT_VERDICT);
        assert!(a.threats.is_empty());
        assert_eq!(a.sender_analysis.report_count, 0);
        assert!(!a.sender_analysis.is_new);
        assert_eq!(a.content_analysis.grammar_score, 1);
        assert!(a.content_analysis.keywords.is_empty());
        assert_eq!(a.recommendations.dos.len(), 1);
    }

    #[test]
    fn test_non_object_input_is_all_defaults() {
        for raw in [json!(null), json!([1, 2]), json!("text"), json!(7)] {
            let a = normalize(&raw, "+913333333333");
            assert_eq!(a.risk_score, DEFAULT_RISK_SCORE);
            assert_eq!(a.risk_level, RiskLevel::Medium);
            assert_eq!(a.content_analysis.grammar_score, DEFAULT_GRAMMAR_SCORE);
        }
    }

    #[test]
    fn test_phone_is_always_overridden() {
        let raw = json!({
            "senderAnalysis": { "phone": "+910000000000", "inContacts": true, "reportCount": 12.6, "isNew": true }
        });
        let a = normalize(&raw, "+914444444444");
        assert_eq!(a.sender_analysis.phone, "+914444444444");
        assert!(!a.sender_analysis.in_contacts);
        assert_eq!(a.sender_analysis.report_count, 13);
        assert!(a.sender_analysis.is_new);
    }

    #[test]
    fn test_well_formed_passes_through() {
        let raw = json!({
            "riskScore": 92,
            "riskLevel": "HIGH",
            "confidence": 94,
            "verdict": "Classic KYC scam",
            "action": "Delete it",
            "threats": [
                { "title": "Suspicious Link", "description": "bit.ly", "severity": "high" },
                { "title": "Urgency" },
                17
            ],
            "contentAnalysis": {
                "hasLinks": true,
                "linkDomain": "bit.ly",
                "hasUrgency": "true",
                "grammarScore": "4",
                "keywords": ["kyc", 3, "urgent"]
            },
            "recommendations": { "do": ["Delete"], "dont": [] }
        });
        let a = normalize(&raw, "+915555555555");

        assert_eq!(a.risk_score, 92);
        assert_eq!(a.risk_level, RiskLevel::High);
        assert_eq!(a.confidence, 94);
        assert_eq!(a.threats.len(), 2);
        assert_eq!(a.threats[0].severity, Severity::High);
        assert_eq!(a.threats[1].severity, Severity::Medium);
        assert_eq!(a.content_analysis.link_domain.as_deref(), Some("bit.ly"));
        assert!(a.content_analysis.has_urgency);
        assert_eq!(a.content_analysis.grammar_score, 4);
        assert_eq!(a.content_analysis.keywords, vec!["kyc", "urgent"]);
        assert_eq!(a.recommendations.dos, vec!["Delete"]);
        assert!(a.recommendations.donts.is_empty());
    }

    #[test]
    fn test_level_disagreement_is_preserved_by_default() {
        let raw = json!({ "riskScore": 92, "riskLevel": "medium" });
        assert_eq!(normalize(&raw, "x").risk_level, RiskLevel::Medium);

        let reconciled = AssessmentNormalizer::new()
            .with_level_reconciliation(true)
            .normalize(&raw, "x");
        assert_eq!(reconciled.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let fenced = "```json\n{\"riskScore\": 70}\n```";
        assert_eq!(parse_classifier_output(fenced).unwrap()["riskScore"], 70);

        let bare_fence = "  ```\n{\"riskScore\": 10}```  ";
        assert_eq!(parse_classifier_output(bare_fence).unwrap()["riskScore"], 10);
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(matches!(
            parse_classifier_output("Sorry, I cannot help with that."),
            Err(ClassifierError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_classifier_output("[1, 2, 3]"),
            Err(ClassifierError::MalformedResponse(_))
        ));
    }
}
