//! Request ids
//!
//! [`normalize_request_id`] runs first and drops client ids that are blank or
//! not valid UTF-8 (and trims the rest). `SetRequestIdLayer` then fills in a
//! UUID where no id is left, so the response header, the trace span and
//! [`RequestId`] all see the same value.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue},
};
use uuid::Uuid;

use crate::error::{ApiError, ErrorReply};

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Middleware: keep a client-supplied id only if it is usable as-is.
pub async fn normalize_request_id(mut request: Request) -> Request {
    let normalized = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .map(|value| usable_id(value).and_then(|id| HeaderValue::from_str(id).ok()));

    match normalized {
        Some(Some(value)) => {
            request.headers_mut().insert(&REQUEST_ID_HEADER, value);
        }
        Some(None) => {
            request.headers_mut().remove(&REQUEST_ID_HEADER);
        }
        None => {}
    }
    request
}

fn usable_id(value: &HeaderValue) -> Option<&str> {
    value
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(&REQUEST_ID_HEADER)
            .and_then(usable_id)
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        RequestId(id)
    }

    /// Bind an error to this request.
    pub fn reject(&self, error: impl Into<ApiError>) -> ErrorReply {
        ErrorReply {
            request_id: self.0.clone(),
            error: error.into(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestId::from_headers(&parts.headers))
    }
}
