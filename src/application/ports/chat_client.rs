use async_trait::async_trait;

use super::token_provider::AuthError;

/// A remote chat-completion endpoint used to rewrite transcripts. One call
/// carries exactly one system prompt and one user message.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_text: &str)
        -> Result<String, ChatClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}
