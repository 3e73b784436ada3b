use async_trait::async_trait;

/// Supplies a bearer token that is guaranteed usable for the immediate
/// outbound call. Implementations own caching and refresh; callers must not
/// hold tokens across requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    RequestFailed(String),
    #[error("token endpoint returned status {0}: {1}")]
    Rejected(u16, String),
    #[error("malformed token response: {0}")]
    MalformedResponse(String),
}
