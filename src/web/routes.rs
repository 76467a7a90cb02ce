//! REST API routes

use super::{ApiError, AppState, ScanCounters};
use crate::assistant::{AnalysisContext, ChatTurn};
use crate::db::{AnalysisRecord, AnalysisStats};
use crate::normalizer::parse_classifier_output;
use crate::submission::Submission;
use crate::{Assessment, Engine, Language};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Header carrying the caller's opaque user id
pub const USER_HEADER: &str = "x-user-id";
pub const ANONYMOUS_USER: &str = "anonymous";

fn user_id(headers: &HeaderMap) -> String {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_USER)
        .to_string()
}

// ============================================================================
// Status
// ============================================================================

#[derive(Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub uptime_seconds: u64,
    pub default_engine: Engine,
    pub ai_enabled: bool,
    pub assistant_enabled: bool,
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds()
        .max(0) as u64;

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        default_engine: state.default_engine,
        ai_enabled: state.remote.is_some(),
        assistant_enabled: state.assistant.is_some(),
    })
}

// ============================================================================
// Scanning
// ============================================================================

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(flatten)]
    pub submission: Submission,
    #[serde(default)]
    pub engine: Option<Engine>,
    #[serde(default)]
    pub save: bool,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    /// Set when the assessment was saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub engine: Engine,
    pub assessment: Assessment,
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    req.submission.validate()?;

    let engine = req.engine.unwrap_or(state.default_engine);
    let classifier = state.classifier(engine)?;
    let assessment = classifier.classify(&req.submission.to_request()).await?;

    state.counters.write().await.record(assessment.risk_level);
    info!(
        "Scan via {}: score={} level={}",
        classifier.name(),
        assessment.risk_score,
        assessment.risk_level
    );

    let id = if req.save {
        let user = user_id(&headers);
        let db = state.db.lock().await;
        Some(db.save_analysis(&user, &req.submission, &assessment)?)
    } else {
        None
    };

    Ok(Json(AnalyzeResponse {
        id,
        engine,
        assessment,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeRequest {
    /// Classifier output: a JSON object, or the model's raw text
    pub raw: Value,
    pub fallback_sender_phone: String,
}

pub async fn normalize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NormalizeRequest>,
) -> Result<Json<Assessment>, ApiError> {
    let raw = match req.raw {
        Value::String(text) => {
            parse_classifier_output(&text).map_err(|e| ApiError::BadRequest(e.to_string()))?
        }
        other if other.is_object() => other,
        _ => return Err(ApiError::BadRequest("expected a JSON object".to_string())),
    };

    Ok(Json(state.normalizer.normalize(&raw, &req.fallback_sender_phone)))
}

// ============================================================================
// Assistant
// ============================================================================

#[derive(Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub context: AnalysisContext,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let assistant = state
        .assistant
        .as_ref()
        .ok_or(ApiError::AssistantUnavailable)?;

    let reply = assistant
        .ask(&req.question, &req.context, req.language, &req.history)
        .await?;
    Ok(Json(ChatResponse { reply }))
}

// ============================================================================
// Saved analyses
// ============================================================================

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

pub async fn list_analyses(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AnalysisRecord>>, ApiError> {
    let db = state.db.lock().await;
    Ok(Json(db.list_analyses(&user_id(&headers), query.limit)?))
}

pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<AnalysisRecord>, ApiError> {
    let db = state.db.lock().await;
    db.get_analysis(&user_id(&headers), &id)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn delete_analysis(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let db = state.db.lock().await;
    if db.delete_analysis(&user_id(&headers), &id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

#[derive(Serialize)]
pub struct StatsResponse {
    /// Saved analyses of the caller
    pub saved: AnalysisStats,
    /// Every scan served since start, saved or not
    pub session: ScanCounters,
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, ApiError> {
    let saved = state.db.lock().await.stats(&user_id(&headers))?;
    let session = state.counters.read().await.clone();
    Ok(Json(StatsResponse { saved, session }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_id_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_id(&headers), ANONYMOUS_USER);

        headers.insert(USER_HEADER, HeaderValue::from_static("  "));
        assert_eq!(user_id(&headers), ANONYMOUS_USER);

        headers.insert(USER_HEADER, HeaderValue::from_static("user-42"));
        assert_eq!(user_id(&headers), "user-42");
    }

    #[test]
    fn test_analyze_request_flattens_submission() {
        let req: AnalyzeRequest = serde_json::from_str(
            r#"{"message":"hi","senderPhone":"+919876543210","inContacts":true,"engine":"ai"}"#,
        )
        .unwrap();
        assert!(req.submission.in_contacts);
        assert_eq!(req.engine, Some(Engine::Ai));
        assert!(!req.save);
    }
}
