use std::time::Duration;

/// Connection settings for the GigaChat provider: one endpoint pair plus
/// the decoding parameters every rewrite call uses.
#[derive(Debug, Clone)]
pub struct GigaChatConfig {
    pub auth_url: String,
    pub api_url: String,
    pub model: String,
    pub scope: String,
    pub api_key: String,
    pub auth_timeout: Duration,
    pub request_timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    /// The provider's production endpoints sit behind a private CA; this
    /// flag lets deployments without that CA installed opt out of
    /// certificate verification. Off unless explicitly enabled.
    pub accept_invalid_certs: bool,
}

impl Default for GigaChatConfig {
    fn default() -> Self {
        Self {
            auth_url: "https://ngw.devices.sberbank.ru:9443/api/v2/oauth".to_string(),
            api_url: "https://gigachat.devices.sberbank.ru/api/v1/chat/completions".to_string(),
            model: "GigaChat:latest".to_string(),
            scope: "GIGACHAT_API_PERS".to_string(),
            api_key: String::new(),
            auth_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            temperature: 0.2,
            max_tokens: 2000,
            accept_invalid_certs: false,
        }
    }
}
