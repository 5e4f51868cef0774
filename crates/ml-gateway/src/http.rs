//! Shared request/response handling for upstream JSON APIs

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{GatewayError, Service};

/// Longest upstream body excerpt carried in an error
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Build the HTTP client shared by every upstream call.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("clauselens/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send a request and decode a JSON body of type `T`.
///
/// Non-2xx statuses and bodies carrying an `error` field both count as
/// failures; the ML service reports model errors as HTTP 200 + `{"error": ..}`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    service: Service,
    request: RequestBuilder,
) -> Result<T, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|source| GatewayError::Transport { service, source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| GatewayError::Transport { service, source })?;

    let parsed = serde_json::from_str::<Value>(&body);

    if !status.is_success() {
        let detail = parsed
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| truncate(&body));
        return Err(GatewayError::Status {
            service,
            status: status.as_u16(),
            body: detail,
        });
    }

    let value = parsed.map_err(|e| GatewayError::Decode {
        service,
        message: e.to_string(),
    })?;

    if let Some(message) = error_message(&value) {
        return Err(GatewayError::Upstream { service, message });
    }

    serde_json::from_value(value).map_err(|e| GatewayError::Decode {
        service,
        message: e.to_string(),
    })
}

/// Pull a message out of `{"error": "..."}` or `{"error": {"message": "..."}}`.
fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(fields) => Some(
            fields
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| Value::Object(fields.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        cut.push('…');
        cut
    }
}
