use serde_json::{json, Value};
use smish_sentinel::error::ClassifierError;
use smish_sentinel::normalizer::{normalize, parse_classifier_output, AssessmentNormalizer};
use smish_sentinel::{RiskLevel, Severity};

#[test]
fn integration_normalize_is_total() {
    let inputs = vec![
        Value::Null,
        json!(true),
        json!(17),
        json!("HIGH"),
        json!([1, 2, 3]),
        json!({}),
        json!({ "riskScore": -40, "confidence": 1e9 }),
        json!({ "riskScore": 1e300, "threats": [null, 5, [], {}] }),
        json!({ "contentAnalysis": [], "senderAnalysis": 12, "recommendations": "none" }),
    ];

    for raw in &inputs {
        let a = normalize(raw, "+919999999999");
        assert!(a.risk_score <= 100, "{}", raw);
        assert!(a.confidence <= 100, "{}", raw);
        assert!((1..=10).contains(&a.content_analysis.grammar_score), "{}", raw);
        assert_eq!(a.sender_analysis.phone, "+919999999999");
        assert!(!a.sender_analysis.in_contacts);
        assert!(!a.recommendations.dos.is_empty());
        assert!(!a.recommendations.donts.is_empty());
    }
}

#[test]
fn integration_well_formed_output_survives() {
    let raw = json!({
        "riskScore": 87.6,
        "riskLevel": "HIGH",
        "confidence": "92",
        "verdict": "Classic KYC update scam",
        "action": "Delete and block",
        "threats": [
            { "title": "Impersonation", "description": "Pretends to be a bank", "severity": "HIGH" },
            "Shortened URL"
        ],
        "senderAnalysis": { "phone": "+10000000000", "inContacts": true, "reportCount": 14.2, "isNew": "yes" },
        "contentAnalysis": {
            "hasLinks": true,
            "linkDomain": "bit.ly",
            "hasUrgency": 1,
            "grammarScore": 3,
            "keywords": ["kyc", 7, "blocked"]
        },
        "recommendations": { "do": ["Call your bank"], "dont": ["Click the link"] }
    });

    let a = normalize(&raw, "+919876543210");
    assert_eq!(a.risk_score, 88);
    assert_eq!(a.risk_level, RiskLevel::High);
    assert_eq!(a.confidence, 92);
    assert_eq!(a.verdict, "Classic KYC update scam");
    assert_eq!(a.threats.len(), 2);
    assert_eq!(a.threats[0].severity, Severity::High);
    assert_eq!(a.threats[1].title, "Shortened URL");
    assert_eq!(a.sender_analysis.phone, "+919876543210");
    assert!(!a.sender_analysis.in_contacts);
    assert_eq!(a.sender_analysis.report_count, 14);
    assert!(a.sender_analysis.is_new);
    assert!(a.content_analysis.has_urgency);
    assert_eq!(a.content_analysis.link_domain.as_deref(), Some("bit.ly"));
    assert_eq!(a.content_analysis.keywords, vec!["kyc", "blocked"]);
    assert_eq!(a.recommendations.dos, vec!["Call your bank"]);
}

#[test]
fn integration_level_disagreement() {
    let raw = json!({ "riskScore": 10, "riskLevel": "HIGH" });

    assert_eq!(normalize(&raw, "x").risk_level, RiskLevel::High);
    let reconciled = AssessmentNormalizer::new()
        .with_level_reconciliation(true)
        .normalize(&raw, "x");
    assert_eq!(reconciled.risk_level, RiskLevel::Low);
    assert_eq!(reconciled.risk_score, 10);
}

#[test]
fn integration_normalize_is_deterministic() {
    let raw = json!({ "riskScore": 42, "threats": [{ "title": "t" }] });
    assert_eq!(normalize(&raw, "p"), normalize(&raw, "p"));
}

#[test]
fn integration_parse_model_reply() {
    let fenced = "```json\n{\"riskScore\": 70, \"riskLevel\": \"high\"}\n```";
    let v = parse_classifier_output(fenced).unwrap();
    assert_eq!(v["riskScore"], 70);

    let bare_fence = "```\n{\"riskScore\": 5}\n```";
    assert_eq!(parse_classifier_output(bare_fence).unwrap()["riskScore"], 5);

    let plain = "  {\"verdict\": \"ok\"}  ";
    assert_eq!(parse_classifier_output(plain).unwrap()["verdict"], "ok");

    assert!(matches!(
        parse_classifier_output("Sorry, I cannot help with that."),
        Err(ClassifierError::MalformedResponse(_))
    ));
    assert!(matches!(
        parse_classifier_output("[1, 2]"),
        Err(ClassifierError::MalformedResponse(_))
    ));
}
