//! History commands - browse, count and purge saved assessments

use smish_sentinel::config::AppConfig;

pub fn list(config: &AppConfig, user: &str, limit: usize) -> anyhow::Result<()> {
    let db = super::open_database(config)?;
    let records = db.list_analyses(user, Some(limit))?;

    println!("📋 Saved assessments for {} (last {} entries)", user, limit);
    println!("─────────────────────────────────────");

    if records.is_empty() {
        println!("\nNo saved assessments yet. Use `scan --save` to keep one.");
        return Ok(());
    }

    for record in records {
        let preview: String = record.message_content.chars().take(60).collect();
        println!(
            "{}  {:<6} {:>3}  {}  {}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.assessment.risk_level.to_string(),
            record.assessment.risk_score,
            record.sender_phone,
            preview
        );
        println!("    id: {}", record.id);
    }

    Ok(())
}

pub fn stats(config: &AppConfig, user: &str) -> anyhow::Result<()> {
    let db = super::open_database(config)?;
    let stats = db.stats(user)?;

    println!("📊 Assessment stats for {}", user);
    println!("─────────────────────────────────────");
    println!("Total:  {}", stats.total);
    println!("🔴 High:   {}", stats.high_risk);
    println!("🟡 Medium: {}", stats.medium_risk);
    println!("🟢 Low:    {}", stats.low_risk);

    Ok(())
}

pub fn purge(config: &AppConfig, days: Option<u32>) -> anyhow::Result<()> {
    let days = days.unwrap_or(config.storage.retention_days);
    if days == 0 {
        anyhow::bail!("no retention period: pass --days or set storage.retention_days");
    }

    let db = super::open_database(config)?;
    let removed = db.purge_older_than(days)?;
    println!("🧹 Removed {} assessments older than {} days", removed, days);

    Ok(())
}
