use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{AuthError, TokenProvider};
use crate::domain::Credential;

use super::gigachat_config::GigaChatConfig;

/// Seconds of validity a token must still have to be handed out. Anything
/// closer to expiry is refreshed before use so the follow-up call cannot
/// race the expiry.
const EXPIRY_MARGIN_SECS: u64 = 60;

/// Single-slot bearer-token cache for the GigaChat OAuth endpoint. The
/// token exchange runs lazily on the first call that finds the slot empty
/// or expiring; the check-then-refresh sequence is serialized so concurrent
/// callers never trigger redundant exchanges. Failed exchanges are not
/// retried here.
pub struct CredentialBroker {
    http: reqwest::Client,
    auth_url: String,
    api_key: String,
    scope: String,
    cached: Mutex<Option<Credential>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_at: u64,
}

impl CredentialBroker {
    pub fn new(config: &GigaChatConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.auth_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            auth_url: config.auth_url.clone(),
            api_key: config.api_key.clone(),
            scope: config.scope.clone(),
            cached: Mutex::new(None),
        })
    }

    async fn exchange_token(&self) -> Result<Credential, AuthError> {
        let response = self
            .http
            .post(&self.auth_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("RqUID", Uuid::new_v4().to_string())
            .header("Accept", "application/json")
            .form(&[("scope", self.scope.as_str())])
            .send()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AuthError::Rejected(status, body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::RequestFailed(e.to_string()))?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        Ok(Credential::new(parsed.access_token, parsed.expires_at))
    }
}

#[async_trait]
impl TokenProvider for CredentialBroker {
    async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;

        if let Some(credential) = cached.as_ref() {
            if credential.is_fresh(now_epoch(), EXPIRY_MARGIN_SECS) {
                tracing::debug!("Using cached access token");
                return Ok(credential.access_token.clone());
            }
        }

        let fresh = self.exchange_token().await?;
        tracing::info!(expires_at = fresh.expires_at, "Obtained new access token");

        let token = fresh.access_token.clone();
        *cached = Some(fresh);

        Ok(token)
    }
}

fn now_epoch() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
