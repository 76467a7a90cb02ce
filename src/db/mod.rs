//! SQLite database for storing finished assessments per user

use super::submission::Submission;
use super::{Assessment, Language, RiskLevel};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub struct Database {
    conn: Connection,
}

/// A saved assessment as read back from storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub user_id: String,
    pub sender_phone: String,
    pub message_content: String,
    pub date_received: Option<String>,
    pub time_received: Option<String>,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub assessment: Assessment,
}

/// Per-user counts by risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total: u64,
    pub high_risk: u64,
    pub medium_risk: u64,
    pub low_risk: u64,
}

impl Database {
    /// Open or create the database
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize database schema
    fn initialize(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS analyses (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                sender_phone TEXT NOT NULL,
                message_content TEXT NOT NULL,
                date_received TEXT,
                time_received TEXT,
                language TEXT NOT NULL,
                risk_score INTEGER NOT NULL,
                risk_level TEXT NOT NULL,
                confidence INTEGER NOT NULL,
                verdict TEXT NOT NULL,
                action TEXT NOT NULL,
                threats TEXT NOT NULL,
                sender_analysis TEXT NOT NULL,
                content_analysis TEXT NOT NULL,
                recommendations TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_analyses_user ON analyses(user_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_analyses_risk ON analyses(risk_level);
            "#,
        )?;

        info!("Database initialized");
        Ok(())
    }

    /// Store an assessment verbatim, returning its id
    pub fn save_analysis(
        &self,
        user_id: &str,
        submission: &Submission,
        assessment: &Assessment,
    ) -> anyhow::Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.conn.execute(
            r#"
            INSERT INTO analyses (id, user_id, sender_phone, message_content, date_received,
                                  time_received, language, risk_score, risk_level, confidence,
                                  verdict, action, threats, sender_analysis, content_analysis,
                                  recommendations, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            "#,
            params![
                id,
                user_id,
                submission.sender_phone,
                submission.message,
                submission.date_received,
                submission.time_received,
                submission.language.to_string(),
                assessment.risk_score,
                assessment.risk_level.to_string(),
                assessment.confidence,
                assessment.verdict,
                assessment.action,
                serde_json::to_string(&assessment.threats)?,
                serde_json::to_string(&assessment.sender_analysis)?,
                serde_json::to_string(&assessment.content_analysis)?,
                serde_json::to_string(&assessment.recommendations)?,
                Utc::now().to_rfc3339(),
            ],
        )?;

        info!("Analysis saved: {}", id);
        Ok(id)
    }

    /// A user's analyses, newest first
    pub fn list_analyses(&self, user_id: &str, limit: Option<usize>) -> anyhow::Result<Vec<AnalysisRecord>> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, sender_phone, message_content, date_received, time_received,
                   language, risk_score, risk_level, confidence, verdict, action,
                   threats, sender_analysis, content_analysis, recommendations, created_at
            FROM analyses
            WHERE user_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit], read_record)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row??);
        }
        Ok(records)
    }

    pub fn get_analysis(&self, user_id: &str, id: &str) -> anyhow::Result<Option<AnalysisRecord>> {
        let record = self
            .conn
            .query_row(
                r#"
                SELECT id, user_id, sender_phone, message_content, date_received, time_received,
                       language, risk_score, risk_level, confidence, verdict, action,
                       threats, sender_analysis, content_analysis, recommendations, created_at
                FROM analyses
                WHERE id = ?1 AND user_id = ?2
                "#,
                params![id, user_id],
                read_record,
            )
            .optional()?;

        record.transpose()
    }

    /// Delete one of the user's analyses; false when nothing matched
    pub fn delete_analysis(&self, user_id: &str, id: &str) -> anyhow::Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM analyses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if deleted > 0 {
            info!("Analysis deleted: {}", id);
        }
        Ok(deleted > 0)
    }

    pub fn stats(&self, user_id: &str) -> anyhow::Result<AnalysisStats> {
        let mut stmt = self.conn.prepare(
            "SELECT risk_level, COUNT(*) FROM analyses WHERE user_id = ?1 GROUP BY risk_level",
        )?;
        let rows = stmt.query_map(params![user_id], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)? as u64))
        })?;

        let mut stats = AnalysisStats::default();
        for row in rows {
            let (level, count) = row?;
            stats.total += count;
            match RiskLevel::parse(&level) {
                Some(RiskLevel::High) => stats.high_risk += count,
                Some(RiskLevel::Medium) => stats.medium_risk += count,
                Some(RiskLevel::Low) => stats.low_risk += count,
                None => {}
            }
        }
        Ok(stats)
    }

    /// Remove analyses older than `days`; returns how many were removed
    pub fn purge_older_than(&self, days: u32) -> anyhow::Result<usize> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        let removed = self.conn.execute(
            "DELETE FROM analyses WHERE created_at < ?1",
            params![cutoff.to_rfc3339()],
        )?;
        if removed > 0 {
            info!("Purged {} analyses older than {} days", removed, days);
        }
        Ok(removed)
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<anyhow::Result<AnalysisRecord>> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let sender_phone: String = row.get(2)?;
    let message_content: String = row.get(3)?;
    let date_received: Option<String> = row.get(4)?;
    let time_received: Option<String> = row.get(5)?;
    let language: String = row.get(6)?;
    let risk_score: u8 = row.get(7)?;
    let risk_level: String = row.get(8)?;
    let confidence: u8 = row.get(9)?;
    let verdict: String = row.get(10)?;
    let action: String = row.get(11)?;
    let threats: String = row.get(12)?;
    let sender_analysis: String = row.get(13)?;
    let content_analysis: String = row.get(14)?;
    let recommendations: String = row.get(15)?;
    let created_at: String = row.get(16)?;

    // JSON columns are decoded outside rusqlite so their errors keep their own type
    Ok((|| -> anyhow::Result<AnalysisRecord> {
        let assessment = Assessment {
            risk_score,
            risk_level: RiskLevel::parse(&risk_level)
                .ok_or_else(|| anyhow::anyhow!("unknown risk level '{}'", risk_level))?,
            confidence,
            verdict,
            action,
            threats: serde_json::from_str(&threats)?,
            sender_analysis: serde_json::from_str(&sender_analysis)?,
            content_analysis: serde_json::from_str(&content_analysis)?,
            recommendations: serde_json::from_str(&recommendations)?,
        };
        Ok(AnalysisRecord {
            id,
            user_id,
            sender_phone,
            message_content,
            date_received,
            time_received,
            language: language.parse().map_err(anyhow::Error::msg)?,
            created_at: DateTime::parse_from_rfc3339(&created_at)?.with_timezone(&Utc),
            assessment,
        })
    })())
}
