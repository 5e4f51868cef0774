//! Application state for the ClauseLens server

use std::sync::Arc;

use anyhow::{Context, Result};
use ml_gateway::{build_http_client, AnalysisBackend, ChatBackend, MlServiceClient, OpenAiChatClient};
use risk_engine::RiskEngine;

use crate::config::ServerConfig;
use crate::store::{AnalysisStore, InMemoryStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn AnalysisStore>,
    pub analysis: Arc<dyn AnalysisBackend>,
    pub chat: Arc<dyn ChatBackend>,
    pub risk: RiskEngine,
}

impl AppState {
    /// Wire the HTTP-backed upstream clients from configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let http = build_http_client(config.upstream_timeout)
            .context("Failed to build upstream HTTP client")?;

        let analysis = MlServiceClient::new(http.clone(), config.ml_service_url.clone());
        let chat = OpenAiChatClient::new(http, config.openai_api_key.clone())
            .with_base_url(config.openai_base_url.clone())
            .with_model(config.chat_model.clone());

        tracing::info!(
            ml_service = analysis.base_url(),
            chat_model = chat.model(),
            "Upstream clients configured"
        );

        Ok(Self::with_backends(
            config,
            Arc::new(InMemoryStore::new()),
            Arc::new(analysis),
            Arc::new(chat),
        ))
    }

    pub fn with_backends(
        config: ServerConfig,
        store: Arc<dyn AnalysisStore>,
        analysis: Arc<dyn AnalysisBackend>,
        chat: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            analysis,
            chat,
            risk: RiskEngine::new(),
        }
    }
}
