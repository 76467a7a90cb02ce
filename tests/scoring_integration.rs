use smish_sentinel::analyzer::{RiskScorer, ScorerOptions};
use smish_sentinel::config::ScoringConfig;
use smish_sentinel::rules::default_signals;
use smish_sentinel::{RiskLevel, Severity};

const SAMPLES: &[&str] = &[
    "",
    "Hi mom, reaching home by 8",
    "Your OTP is 123456, do not share.",
    "URGENT: your account will be blocked today",
    "Congratulations! You won ₹5 lakhs. Claim at http://bit.ly/claim-now",
    "URGENT! Share your OTP and PIN now or lose access: https://kyc-update.in/verify. You have won a prize!",
    "Your password expires soon, tap the link",
    "ПРИВЕТ 🎉 ünïcödé text with no triggers",
];

const SENDERS: &[&str] = &["+919876543210", "HDFCBK", "", "not a phone"];

#[test]
fn integration_scores_are_bounded_and_levels_consistent() {
    let scorer = RiskScorer::default();
    for text in SAMPLES {
        for sender in SENDERS {
            for in_contacts in [true, false] {
                let a = scorer.score(text, sender, in_contacts);
                assert!(a.risk_score <= 100, "{}", text);
                assert!(a.confidence <= 100);
                assert!((1..=10).contains(&a.content_analysis.grammar_score));
                assert_eq!(a.risk_level, RiskLevel::from_score(a.risk_score), "{}", text);
                assert_eq!(a.sender_analysis.phone, *sender);
                assert_eq!(a.sender_analysis.in_contacts, in_contacts);
            }
        }
    }
}

#[test]
fn integration_scoring_is_idempotent() {
    let scorer = RiskScorer::default();
    for text in SAMPLES {
        assert_eq!(
            scorer.score(text, "+919876543210", false),
            scorer.score(text, "+919876543210", false)
        );
    }
}

#[test]
fn integration_adding_triggers_never_lowers_the_score() {
    let scorer = RiskScorer::default();
    let triggers = ["http://x.co/a", "urgent", "otp", "prize", "block", "bit.ly/z"];

    for text in SAMPLES {
        let base = scorer.score(text, "+919876543210", false).risk_score;
        for trigger in triggers {
            let extended = format!("{} {}", text, trigger);
            let score = scorer.score(&extended, "+919876543210", false).risk_score;
            assert!(score >= base, "'{}' lowered the score of '{}'", trigger, text);
        }
    }
}

#[test]
fn integration_contacts_never_raise_the_score() {
    let scorer = RiskScorer::default();
    for text in SAMPLES {
        let known = scorer.score(text, "+919876543210", true);
        let unknown = scorer.score(text, "+919876543210", false);
        assert!(known.risk_score <= unknown.risk_score);
        assert!(!known.threats.iter().any(|t| t.title == "Unknown Sender"));
        assert!(unknown.threats.iter().any(|t| t.title == "Unknown Sender"));
    }
}

#[test]
fn integration_full_scam_saturates() {
    let scorer = RiskScorer::default();
    let a = scorer.score(SAMPLES[5], "+919876543210", false);

    assert_eq!(a.risk_score, 100);
    assert_eq!(a.risk_level, RiskLevel::High);
    assert!(a.content_analysis.has_links);
    assert!(a.content_analysis.has_urgency);
    assert_eq!(a.content_analysis.link_domain.as_deref(), Some("kyc-update.in"));
    assert!(a.sender_analysis.is_new);
    assert!((10..60).contains(&a.sender_analysis.report_count));
    assert_eq!(a.recommendations.dos.len(), 5);
    assert_eq!(a.recommendations.donts.len(), 5);

    let titles: Vec<&str> = a.threats.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Suspicious Link Detected",
            "Urgency Tactics Detected",
            "Information Request (Red Flag)",
            "Too-Good-To-Be-True Offer",
            "Unknown Sender",
        ]
    );
    assert_eq!(a.threats[3].severity, Severity::Medium);
}

#[test]
fn integration_low_risk_message() {
    let a = RiskScorer::default().score("Hi mom, reaching home by 8", "+919876543210", true);

    assert_eq!(a.risk_score, 20);
    assert_eq!(a.risk_level, RiskLevel::Low);
    assert!(a.threats.is_empty());
    assert!(a.content_analysis.keywords.is_empty());
    assert!(a.content_analysis.link_domain.is_none());
    assert_eq!(a.sender_analysis.report_count, 0);
    assert!(!a.sender_analysis.is_new);
}

#[test]
fn integration_disabled_signal_is_ignored() {
    let mut signals = default_signals();
    for s in signals.iter_mut().filter(|s| s.name == "sensitive_request") {
        s.enabled = false;
    }
    let scorer = RiskScorer::new(signals, ScorerOptions::default());

    let a = scorer.score("Your OTP is 123456", "+919876543210", true);
    assert_eq!(a.risk_score, 20);
    assert!(a.threats.is_empty());
}

#[test]
fn integration_signal_file_replaces_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("signals.yaml");
    std::fs::write(
        &path,
        r#"
- name: courier
  kind: custom
  any_of: ["parcel", "customs fee"]
  weight: 30
  title: Courier Scam
  description: Fake delivery or customs fee request
  severity: high
"#,
    )
    .unwrap();

    let scoring = ScoringConfig {
        signals_path: Some(path.to_string_lossy().into_owned()),
        ..ScoringConfig::default()
    };
    let scorer = scoring.build_scorer().unwrap();
    assert_eq!(scorer.signals().len(), 1);

    let a = scorer.score("Pay the customs fee for your parcel", "+919876543210", true);
    assert_eq!(a.risk_score, 50);
    assert_eq!(a.risk_level, RiskLevel::Medium);
    assert_eq!(a.threats[0].title, "Courier Scam");
    assert_eq!(a.content_analysis.keywords, vec!["parcel", "customs fee"]);

    // OTP is no longer a trigger with the replaced set
    assert_eq!(scorer.score("otp", "+919876543210", true).risk_score, 20);
}

#[test]
fn integration_shipped_signal_file_matches_builtins() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/signals.yaml");
    let loaded = smish_sentinel::rules::load_signals_from_file(&path).unwrap();
    let builtin = default_signals();

    let enabled: Vec<_> = loaded.iter().filter(|s| s.enabled).collect();
    assert_eq!(enabled.len(), builtin.len());
    for (file, code) in enabled.iter().zip(&builtin) {
        assert_eq!(file.name, code.name);
        assert_eq!(file.kind, code.kind);
        assert_eq!(file.any_of, code.any_of);
        assert_eq!(file.weight, code.weight);
        assert_eq!(file.title, code.title);
        assert_eq!(file.severity, code.severity);
    }
}
