//! ClauseLens Server
//!
//! Backend for legal document risk analysis. Provides REST endpoints for:
//!
//! - Document upload (PDF/DOCX) with text extraction
//! - Analysis: summary, named entities and clause classification from the ML
//!   service, aggregated into risk buckets
//! - A chat assistant answering questions about the document
//! - Reads of the most recent analysis for the dashboard
//!
//! ## Architecture
//!
//! The server holds no document data beyond the latest analysis report. All
//! model work is delegated upstream:
//!
//! - the ML service (`/summarize`, `/ner`, `/classify`), called concurrently
//! - an OpenAI-compatible chat-completion API

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod error;
mod request_id;
mod routes;
mod state;
mod store;
mod upload;

use config::{Args, ServerConfig};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose {
        "clauselens_server=debug,ml_gateway=debug,doc_extract=debug,tower_http=debug"
    } else {
        "clauselens_server=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match ServerConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    config.upload_dir = tokio::fs::canonicalize(&config.upload_dir).await?;

    info!("Starting ClauseLens server on {}", config.bind_addr);
    info!("Upload directory: {}", config.upload_dir.display());
    info!("Upstream timeout: {}ms", config.upstream_timeout.as_millis());

    let addr = config.bind_addr;
    let state = AppState::new(config)?;
    let app = routes::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
