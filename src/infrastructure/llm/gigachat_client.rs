use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ChatClientError, ChatCompletionClient, TokenProvider};

use super::gigachat_config::GigaChatConfig;

/// GigaChat chat-completions adapter. Every call first asks the token
/// provider for a usable bearer token, then issues one completion request
/// with the fixed decoding parameters from the config.
pub struct GigaChatClient {
    http: reqwest::Client,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    tokens: Arc<dyn TokenProvider>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl GigaChatClient {
    pub fn new(
        config: &GigaChatConfig,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            tokens,
        })
    }
}

#[async_trait]
impl ChatCompletionClient for GigaChatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, ChatClientError> {
        let token = self.tokens.access_token().await?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(model = %self.model, "Sending chat completion request");

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", token))
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatClientError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ChatClientError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ChatClientError::ApiRequestFailed(format!("read body: {}", e)))?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ChatClientError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                ChatClientError::MalformedResponse(
                    "no completion choice with message content".to_string(),
                )
            })?;

        tracing::info!(chars = content.len(), "Chat completion received");

        Ok(content)
    }
}
