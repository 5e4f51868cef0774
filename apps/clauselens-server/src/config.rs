//! Server configuration
//!
//! Parsed once at startup from flags and environment (after `.env` is loaded)
//! and threaded through [`crate::state::AppState`]. Nothing reads the
//! environment after this point.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use clap::Parser;
use thiserror::Error;

/// Command-line arguments for the ClauseLens server
#[derive(Parser, Debug, Clone)]
#[command(name = "clauselens-server")]
#[command(about = "Legal document analysis server: upload, ML analysis proxy, chat assistant")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5050")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Base URL of the ML analysis service (required)
    #[arg(long, env = "ML_SERVICE_URL")]
    pub ml_service_url: Option<String>,

    /// API key for the chat-completion API (required)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the chat-completion API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = ml_gateway::chat::DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Chat model name
    #[arg(long, env = "CHAT_MODEL", default_value = ml_gateway::chat::DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Directory uploaded files are written to
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Maximum accepted upload body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value = "20971520")]
    pub max_upload_bytes: usize,

    /// Timeout for each upstream HTTP call in milliseconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_MS", default_value = "60000")]
    pub upstream_timeout_ms: u64,

    /// Origin allowed by CORS
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_origin: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing {0}: set it in the environment, .env, or on the command line")]
    Missing(&'static str),

    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Validated configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub ml_service_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub upstream_timeout: Duration,
    pub cors_origin: HeaderValue,
}

impl ServerConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let ml_service_url = required(&args.ml_service_url, "ML_SERVICE_URL")?;
        let openai_api_key = required(&args.openai_api_key, "OPENAI_API_KEY")?;

        let ml_service_url = http_url(&ml_service_url, "ML_SERVICE_URL")?;
        let openai_base_url = http_url(&args.openai_base_url, "OPENAI_BASE_URL")?;

        let bind_addr = format!("{}:{}", args.host, args.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "HOST",
                reason: e.to_string(),
            })?;

        let cors_origin =
            HeaderValue::from_str(&args.cors_origin).map_err(|e| ConfigError::Invalid {
                name: "CORS_ORIGIN",
                reason: e.to_string(),
            })?;

        if args.upstream_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_MS",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            ml_service_url,
            openai_api_key,
            openai_base_url,
            chat_model: args.chat_model.clone(),
            upload_dir: args.upload_dir.clone(),
            max_upload_bytes: args.max_upload_bytes,
            upstream_timeout: Duration::from_millis(args.upstream_timeout_ms),
            cors_origin,
        })
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("ml_service_url", &self.ml_service_url)
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("chat_model", &self.chat_model)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or(ConfigError::Missing(name))
}

/// Accept only absolute http(s) URLs; strips trailing slashes.
fn http_url(value: &str, name: &'static str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .map(|(_, rest)| !rest.is_empty())
        .unwrap_or(false);

    if has_scheme && has_host {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::Invalid {
            name,
            reason: format!("'{}' is not an http(s) URL", value),
        })
    }
}
