//! Client for the ML analysis service
//!
//! The service exposes three independent endpoints, each taking `{"text": ..}`:
//!
//! - `POST /summarize` → `{"summary": string}`
//! - `POST /ner` → `{"entities": [Entity]}`
//! - `POST /classify` → `{"classification": [Clause]}`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared_types::{Clause, Entity};
use tracing::{debug, instrument};

use crate::http::send_json;
use crate::{GatewayError, Service};

/// The three analysis calls. Implemented over HTTP by [`MlServiceClient`];
/// tests substitute their own.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, GatewayError>;
    async fn entities(&self, text: &str) -> Result<Vec<Entity>, GatewayError>;
    async fn classify(&self, text: &str) -> Result<Vec<Clause>, GatewayError>;
}

/// Combined result of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub summary: String,
    pub entities: Vec<Entity>,
    pub clauses: Vec<Clause>,
}

/// Run summarize, NER and classify concurrently and wait for all three.
///
/// Fail-fast: the first error completes the join and the two sibling futures
/// are dropped, which cancels their in-flight requests. No partial outcome is
/// ever returned and nothing is retried.
pub async fn analyze_concurrently(
    backend: &dyn AnalysisBackend,
    text: &str,
) -> Result<AnalysisOutcome, GatewayError> {
    let (summary, entities, clauses) = tokio::try_join!(
        backend.summarize(text),
        backend.entities(text),
        backend.classify(text),
    )?;

    Ok(AnalysisOutcome {
        summary,
        entities,
        clauses,
    })
}

#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Deserialize)]
struct NerResponse {
    #[serde(default)]
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    classification: Vec<Clause>,
}

/// HTTP client for the ML service
#[derive(Clone)]
pub struct MlServiceClient {
    http: Client,
    base_url: String,
}

impl MlServiceClient {
    /// `base_url` without a trailing slash, e.g. `http://127.0.0.1:8000`
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, service: Service) -> String {
        format!("{}/{}", self.base_url, service.as_str())
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        service: Service,
        text: &str,
    ) -> Result<T, GatewayError> {
        let request = self
            .http
            .post(self.endpoint(service))
            .json(&TextBody { text });
        send_json(service, request).await
    }
}

#[async_trait]
impl AnalysisBackend for MlServiceClient {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn summarize(&self, text: &str) -> Result<String, GatewayError> {
        let response: SummaryResponse = self.post(Service::Summarize, text).await?;
        debug!(len = response.summary.len(), "summary received");
        Ok(response.summary)
    }

    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn entities(&self, text: &str) -> Result<Vec<Entity>, GatewayError> {
        let response: NerResponse = self.post(Service::Ner, text).await?;
        debug!(count = response.entities.len(), "entities received");
        Ok(response.entities)
    }

    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn classify(&self, text: &str) -> Result<Vec<Clause>, GatewayError> {
        let response: ClassifyResponse = self.post(Service::Classify, text).await?;
        debug!(count = response.classification.len(), "clauses received");
        Ok(response
            .classification
            .into_iter()
            .map(Clause::normalized)
            .collect())
    }
}
