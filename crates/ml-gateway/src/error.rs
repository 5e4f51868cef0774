use std::fmt;

use thiserror::Error;

/// The upstream endpoint a request was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Summarize,
    Ner,
    Classify,
    Chat,
}

impl Service {
    pub fn as_str(self) -> &'static str {
        match self {
            Service::Summarize => "summarize",
            Service::Ner => "ner",
            Service::Classify => "classify",
            Service::Chat => "chat",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single upstream call. Every variant names its service.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: Service,
        status: u16,
        body: String,
    },

    #[error("{service} reported an error: {message}")]
    Upstream { service: Service, message: String },

    #[error("{service} response could not be decoded: {message}")]
    Decode { service: Service, message: String },

    #[error("{service} returned no completion")]
    EmptyCompletion { service: Service },
}

impl GatewayError {
    pub fn service(&self) -> Service {
        match self {
            GatewayError::Transport { service, .. }
            | GatewayError::Status { service, .. }
            | GatewayError::Upstream { service, .. }
            | GatewayError::Decode { service, .. }
            | GatewayError::EmptyCompletion { service } => *service,
        }
    }
}
