//! HTTP API for scanning messages and browsing saved analyses

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::assistant::ChatAssistant;
use crate::classifier::{Classifier, GatewayClassifier, HeuristicClassifier};
use crate::config::AppConfig;
use crate::db::Database;
use crate::error::GatewayError;
use crate::gateway::GatewayClient;
use crate::normalizer::AssessmentNormalizer;
use crate::{Engine, RiskLevel};

pub use error::ApiError;

/// Shared state for the web server
pub struct AppState {
    /// Local keyword heuristic, always available
    pub heuristic: Box<dyn Classifier>,
    /// Remote classifier; absent when no gateway key is configured
    pub remote: Option<Box<dyn Classifier>>,
    pub assistant: Option<ChatAssistant>,
    pub normalizer: AssessmentNormalizer,
    pub default_engine: Engine,
    pub db: Mutex<Database>,
    /// Server start time
    pub started_at: chrono::DateTime<chrono::Utc>,
    /// Scan counters since start
    pub counters: RwLock<ScanCounters>,
}

/// Runtime scan counters
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ScanCounters {
    pub total_scans: u64,
    pub high_risk: u64,
    pub medium_risk: u64,
    pub low_risk: u64,
}

impl ScanCounters {
    pub fn record(&mut self, level: RiskLevel) {
        self.total_scans += 1;
        match level {
            RiskLevel::High => self.high_risk += 1,
            RiskLevel::Medium => self.medium_risk += 1,
            RiskLevel::Low => self.low_risk += 1,
        }
    }
}

impl AppState {
    /// Wire classifiers from configuration. A missing gateway key disables the
    /// remote engine and the assistant instead of failing startup.
    pub fn from_config(config: &AppConfig, db: Database) -> anyhow::Result<Self> {
        let scorer = config.scoring.build_scorer()?;
        let normalizer = config.normalizer.build_normalizer();

        let gateway = match GatewayClient::from_config(&config.gateway) {
            Ok(client) => Some(client),
            Err(GatewayError::MissingApiKey) => {
                warn!("No gateway API key configured; AI engine and chat assistant disabled");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let remote = gateway.clone().map(|client| {
            Box::new(GatewayClassifier::new(client, normalizer)) as Box<dyn Classifier>
        });

        Ok(Self {
            heuristic: Box::new(HeuristicClassifier::new(scorer)),
            remote,
            assistant: gateway.map(ChatAssistant::new),
            normalizer,
            default_engine: config.server.default_engine,
            db: Mutex::new(db),
            started_at: chrono::Utc::now(),
            counters: RwLock::new(ScanCounters::default()),
        })
    }

    pub fn classifier(&self, engine: Engine) -> Result<&dyn Classifier, ApiError> {
        match engine {
            Engine::Heuristic => Ok(self.heuristic.as_ref()),
            Engine::Ai => self
                .remote
                .as_deref()
                .ok_or(ApiError::EngineUnavailable(Engine::Ai)),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(routes::get_status))
        .route("/api/analyze", post(routes::analyze))
        .route("/api/normalize", post(routes::normalize))
        .route("/api/chat", post(routes::chat))
        .route("/api/analyses", get(routes::list_analyses))
        .route(
            "/api/analyses/:id",
            get(routes::get_analysis).delete(routes::delete_analysis),
        )
        .route("/api/stats", get(routes::get_stats))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Start the web server
pub async fn start_server(listen: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen).await?;

    info!("🌐 Web server starting on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut counters = ScanCounters::default();
        counters.record(RiskLevel::High);
        counters.record(RiskLevel::Low);
        counters.record(RiskLevel::High);
        assert_eq!(counters.total_scans, 3);
        assert_eq!(counters.high_risk, 2);
        assert_eq!(counters.medium_risk, 0);
        assert_eq!(counters.low_risk, 1);
    }

    #[test]
    fn test_missing_key_disables_remote() {
        let mut config = AppConfig::default();
        config.gateway.api_key = Some("   ".to_string());
        std::env::remove_var(crate::gateway::API_KEY_ENV);

        let state = AppState::from_config(&config, Database::open_in_memory().unwrap()).unwrap();
        assert!(state.remote.is_none());
        assert!(state.assistant.is_none());
        assert!(state.classifier(Engine::Heuristic).is_ok());
        assert!(matches!(
            state.classifier(Engine::Ai),
            Err(ApiError::EngineUnavailable(Engine::Ai))
        ));
    }
}
