//! Upstream gateway for document analysis
//!
//! Two external dependencies sit behind this crate:
//!
//! - the ML service (summarization, named-entity recognition, clause
//!   classification), reached through [`MlServiceClient`]
//! - a chat-completion API, reached through [`OpenAiChatClient`]
//!
//! Both are exposed as traits ([`AnalysisBackend`], [`ChatBackend`]) so the
//! server can hold them as `Arc<dyn ..>` and tests can swap in stubs. Nothing
//! here retries; a failure is reported once, naming the service that failed.

pub mod analysis;
pub mod chat;
mod error;
mod http;

pub use analysis::{analyze_concurrently, AnalysisBackend, AnalysisOutcome, MlServiceClient};
pub use chat::{ChatBackend, OpenAiChatClient, CHAT_TEMPERATURE, SYSTEM_PROMPT};
pub use error::{GatewayError, Service};
pub use http::build_http_client;
