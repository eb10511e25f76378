//! Language-model chat transport.

use std::future::Future;
use std::time::Duration;

use aiatc_core::ChatMessage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("chat service returned no choices")]
    EmptyResponse,
    #[error("{0}")]
    Service(String),
}

/// Single-shot chat completion. The full history is passed on every call.
pub trait ChatService: Send + Sync + 'static {
    fn send(
        &self,
        messages: Vec<ChatMessage>,
    ) -> impl Future<Output = Result<ChatMessage, ChatError>> + Send;
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct HttpChatClient {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

impl HttpChatClient {
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ChatError> {
        Self::new(
            &config.chat_url,
            &config.chat_model,
            config.chat_api_key.clone(),
            config.chat_timeout(),
        )
    }
}

impl ChatService for HttpChatClient {
    async fn send(&self, messages: Vec<ChatMessage>) -> Result<ChatMessage, ChatError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: &messages,
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(key) = self.api_key.as_deref() {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: CompletionResponse = response.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(ChatError::EmptyResponse)
    }
}
