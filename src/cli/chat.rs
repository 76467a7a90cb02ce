//! Chat command - ask the assistant about a message

use smish_sentinel::assistant::{AnalysisContext, ChatAssistant};
use smish_sentinel::config::AppConfig;
use smish_sentinel::gateway::GatewayClient;
use smish_sentinel::Language;

pub async fn run(
    config: &AppConfig,
    question: &str,
    message: Option<&str>,
    sender: Option<&str>,
    language: Language,
) -> anyhow::Result<()> {
    // Ground the answer in a local scan of the message when one is given
    let context = match message {
        Some(text) => {
            let scorer = config.scoring.build_scorer()?;
            let assessment = scorer.score(text, sender.unwrap_or("unknown"), false);
            AnalysisContext::from_assessment(text, &assessment)
        }
        None => AnalysisContext::default(),
    };

    let assistant = ChatAssistant::new(GatewayClient::from_config(&config.gateway)?);
    let reply = assistant.ask(question, &context, language, &[]).await?;

    println!("🤖 {}", reply);
    Ok(())
}
