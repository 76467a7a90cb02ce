//! Scan command - score one message

use smish_sentinel::classifier::{Classifier, GatewayClassifier, HeuristicClassifier};
use smish_sentinel::config::AppConfig;
use smish_sentinel::gateway::GatewayClient;
use smish_sentinel::submission::Submission;
use smish_sentinel::{Assessment, Language, RiskLevel, Severity};

pub struct ScanOptions {
    pub in_contacts: bool,
    pub ai: bool,
    pub language: Language,
    pub json: bool,
    /// Save under this user when set
    pub save_as: Option<String>,
}

pub async fn run(
    config: &AppConfig,
    message: &str,
    sender: &str,
    opts: ScanOptions,
) -> anyhow::Result<()> {
    let mut submission = Submission {
        in_contacts: opts.in_contacts,
        language: opts.language,
        ..Submission::new(message, sender)
    };
    // Stored history only takes well-formed submissions
    if opts.save_as.is_some() {
        submission = submission.with_formatted_phone();
        submission.validate()?;
    }

    let classifier: Box<dyn Classifier> = if opts.ai {
        let gateway = GatewayClient::from_config(&config.gateway)?;
        Box::new(GatewayClassifier::new(
            gateway,
            config.normalizer.build_normalizer(),
        ))
    } else {
        Box::new(HeuristicClassifier::new(config.scoring.build_scorer()?))
    };

    let assessment = classifier.classify(&submission.to_request()).await?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print_assessment(&assessment, classifier.name());
    }

    if let Some(user) = opts.save_as {
        let db = super::open_database(config)?;
        let id = db.save_analysis(&user, &submission, &assessment)?;
        if !opts.json {
            println!("\n💾 Saved as {}", id);
        }
    }

    Ok(())
}

fn level_icon(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "🔴",
        RiskLevel::Medium => "🟡",
        RiskLevel::Low => "🟢",
    }
}

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "❗",
        Severity::Medium => "⚠️",
        Severity::Low => "ℹ️",
    }
}

fn print_assessment(assessment: &Assessment, engine: &str) {
    println!(
        "{} {} RISK  (score {}/100, confidence {}%, via {})",
        level_icon(assessment.risk_level),
        assessment.risk_level,
        assessment.risk_score,
        assessment.confidence,
        engine
    );
    println!("─────────────────────────────────────");
    println!("{}", assessment.verdict);
    println!("➡️  {}", assessment.action);

    if !assessment.threats.is_empty() {
        println!("\nThreats:");
        for threat in &assessment.threats {
            println!(
                "  {} {} - {}",
                severity_icon(threat.severity),
                threat.title,
                threat.description
            );
        }
    }

    let content = &assessment.content_analysis;
    if let Some(ref domain) = content.link_domain {
        println!("\nLink domain: {}", domain);
    }
    if !content.keywords.is_empty() {
        println!("Keywords: {}", content.keywords.join(", "));
    }

    println!("\n✅ Do:");
    for item in &assessment.recommendations.dos {
        println!("  - {}", item);
    }
    println!("❌ Don't:");
    for item in &assessment.recommendations.donts {
        println!("  - {}", item);
    }
}
