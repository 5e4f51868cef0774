//! API handlers for the ClauseLens server
//!
//! Provides REST endpoints for:
//! - Document analysis (ML service fan-out, risk aggregation)
//! - Legal chat assistant
//! - Reads of the latest analysis (summary, clauses, risk chart data)

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ml_gateway::analyze_concurrently;
use serde::{Deserialize, Serialize};
use shared_types::{AnalysisReport, Clause, Entity, RiskBucket};
use tracing::{debug, info};

use crate::error::{ApiError, ErrorReply};
use crate::request_id::RequestId;
use crate::state::AppState;
use crate::upload::extract_stored;

/// Shortest text, in characters, accepted for analysis
pub const MIN_ANALYZE_CHARS: usize = 10;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "clauselens-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Body of `POST /analyze`: raw text, or the `filePath` returned by `/upload`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub summary: String,
    pub entities: Vec<Entity>,
    pub classification: Vec<Clause>,
}

/// Handler: POST /analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    id: RequestId,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ErrorReply> {
    let Json(request) = body.map_err(|e| id.reject(ApiError::Validation(e.body_text())))?;

    // An empty `text` counts as absent so `filePath` can take over
    let text = match (request.text.filter(|t| !t.is_empty()), request.file_path) {
        (Some(text), _) => text,
        (None, Some(path)) => extract_stored(&state.config.upload_dir, &path)
            .await
            .map_err(|e| id.reject(e))?,
        (None, None) => String::new(),
    };

    validate_analyze_text(&text).map_err(|e| id.reject(e))?;

    debug!(chars = text.chars().count(), "Analyzing document");

    let outcome = analyze_concurrently(state.analysis.as_ref(), &text)
        .await
        .map_err(|e| id.reject(e))?;

    let buckets = state.risk.aggregate(&outcome.clauses);
    info!(
        clauses = outcome.clauses.len(),
        entities = outcome.entities.len(),
        overall = %state.risk.overall_risk(&buckets),
        "Analysis complete"
    );

    state
        .store
        .put(AnalysisReport::new(
            outcome.summary.clone(),
            outcome.clauses.clone(),
            buckets,
        ))
        .await;

    Ok(Json(AnalyzeResponse {
        summary: outcome.summary,
        entities: outcome.entities,
        classification: outcome.clauses,
    }))
}

fn validate_analyze_text(text: &str) -> Result<(), ApiError> {
    if text.chars().count() < MIN_ANALYZE_CHARS {
        return Err(ApiError::Validation("Invalid document text.".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Handler: POST /chat and POST /ask
pub async fn handle_chat(
    State(state): State<AppState>,
    id: RequestId,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ErrorReply> {
    let Json(request) = body.map_err(|e| id.reject(ApiError::Validation(e.body_text())))?;

    let (question, context) = match (non_blank(request.question), non_blank(request.context)) {
        (Some(q), Some(c)) => (q, c),
        _ => {
            return Err(id.reject(ApiError::Validation(
                "Missing question or context.".to_string(),
            )))
        }
    };

    let answer = state
        .chat
        .ask(&question, &context)
        .await
        .map_err(|e| id.reject(e))?;

    Ok(Json(ChatResponse { answer }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Handler: GET /api/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    id: RequestId,
) -> Result<Json<String>, ErrorReply> {
    state
        .store
        .summary()
        .await
        .map(Json)
        .ok_or_else(|| id.reject(ApiError::NotFound("Summary not available")))
}

/// Handler: GET /api/clauses
pub async fn handle_clauses(
    State(state): State<AppState>,
    id: RequestId,
) -> Result<Json<Vec<Clause>>, ErrorReply> {
    state
        .store
        .clauses()
        .await
        .map(Json)
        .ok_or_else(|| id.reject(ApiError::NotFound("Clauses not available")))
}

/// Handler: GET /api/risk-data
pub async fn handle_risk_data(
    State(state): State<AppState>,
    id: RequestId,
) -> Result<Json<Vec<RiskBucket>>, ErrorReply> {
    state
        .store
        .risk_buckets()
        .await
        .map(Json)
        .ok_or_else(|| id.reject(ApiError::NotFound("Risk data not available")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length_counts_characters() {
        assert!(validate_analyze_text("123456789").is_err());
        assert!(validate_analyze_text("1234567890").is_ok());
        // Ten multi-byte characters
        assert!(validate_analyze_text("§§§§§§§§§§").is_ok());
        // Whitespace counts
        assert!(validate_analyze_text("          ").is_ok());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("x".to_string())), Some("x".to_string()));
    }
}
