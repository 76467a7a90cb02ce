//! Normalize command - turn raw classifier output into an assessment

use anyhow::Context;
use smish_sentinel::config::AppConfig;
use smish_sentinel::normalizer::parse_classifier_output;
use std::io::Read;
use std::path::Path;

pub fn run(config: &AppConfig, file: Option<&Path>, sender: &str) -> anyhow::Result<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let raw = parse_classifier_output(&content)?;
    let assessment = config.normalizer.build_normalizer().normalize(&raw, sender);
    println!("{}", serde_json::to_string_pretty(&assessment)?);

    Ok(())
}
