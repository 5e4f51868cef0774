//! Chat-completion client (OpenAI-compatible `/v1/chat/completions`)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::http::send_json;
use crate::{GatewayError, Service};

/// System instruction framing the assistant
pub const SYSTEM_PROMPT: &str =
    "You are a legal document assistant who explains legal terms and risks clearly.";

/// Fixed sampling temperature
pub const CHAT_TEMPERATURE: f32 = 0.7;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Answers a question about a document, given the document context.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn ask(&self, question: &str, context: &str) -> Result<String, GatewayError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Build the user turn sent with every question.
pub fn user_prompt(question: &str, context: &str) -> String {
    format!("Context:\n{}\n\nQuestion:\n{}", context, question)
}

/// HTTP client for the chat-completion API
#[derive(Clone)]
pub struct OpenAiChatClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatBackend for OpenAiChatClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn ask(&self, question: &str, context: &str) -> Result<String, GatewayError> {
        let user = user_prompt(question, context);
        let body = CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: CHAT_TEMPERATURE,
        };

        let request = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);

        let response: CompletionResponse = send_json(Service::Chat, request).await?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GatewayError::EmptyCompletion {
                service: Service::Chat,
            })?;

        debug!(len = answer.len(), "completion received");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_layout() {
        assert_eq!(
            user_prompt("Is this fair?", "Rent is due daily."),
            "Context:\nRent is due daily.\n\nQuestion:\nIs this fair?"
        );
    }

    #[test]
    fn test_builder_defaults() {
        let client = OpenAiChatClient::new(Client::new(), "sk-test")
            .with_base_url("http://localhost:9999/");
        assert_eq!(client.model(), DEFAULT_CHAT_MODEL);
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
