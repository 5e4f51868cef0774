//! Router and middleware stack

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, Method, Request},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::api::{
    handle_analyze, handle_chat, handle_clauses, handle_health, handle_risk_data, handle_summary,
};
use crate::request_id::{normalize_request_id, REQUEST_ID_HEADER};
use crate::state::AppState;
use crate::upload::handle_upload;

pub fn build_router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    // Request ids are settled first so the trace span and handlers both see them
    let stack = ServiceBuilder::new()
        .layer(middleware::map_request(normalize_request_id))
        .layer(SetRequestIdLayer::new(
            REQUEST_ID_HEADER.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(&REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER.clone()))
        .layer(cors);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Document intake and analysis
        .route("/upload", post(handle_upload))
        .route("/analyze", post(handle_analyze))
        // Chat assistant
        .route("/chat", post(handle_chat))
        .route("/ask", post(handle_chat))
        // Latest analysis
        .route("/api/summary", get(handle_summary))
        .route("/api/clauses", get(handle_clauses))
        .route("/api/risk-data", get(handle_risk_data))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(stack)
        .with_state(state)
}
