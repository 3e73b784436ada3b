use std::fmt::Display;
use std::str::FromStr;

use crate::infrastructure::audio::DevicePreference;
use crate::infrastructure::llm::GigaChatConfig;

use super::environment::Environment;

/// Service configuration resolved from the process environment. Every knob
/// has a default except the GigaChat credential.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub gigachat: GigaChatSettings,
    pub recognition: RecognitionSettings,
    pub synthesis: SynthesisSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct GigaChatSettings {
    pub auth_url: String,
    pub api_url: String,
    pub model: String,
    pub scope: String,
    pub api_key: String,
    pub accept_invalid_certs: bool,
}

impl GigaChatSettings {
    /// Client configuration with the standard timeouts and decoding
    /// parameters filled in.
    pub fn client_config(&self) -> GigaChatConfig {
        GigaChatConfig {
            auth_url: self.auth_url.clone(),
            api_url: self.api_url.clone(),
            model: self.model.clone(),
            scope: self.scope.clone(),
            api_key: self.api_key.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
            ..GigaChatConfig::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecognitionSettings {
    pub default_model: String,
    pub device: DevicePreference,
}

#[derive(Debug, Clone)]
pub struct SynthesisSettings {
    pub server_url: String,
    pub output_dir: String,
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: String,
    pub max_file_size_mb: usize,
}

impl UploadSettings {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required environment variable: {0}")]
    MissingVariable(&'static str),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let environment = env_or("APP_ENV", "local")
            .parse::<Environment>()
            .map_err(|message| SettingsError::InvalidValue {
                name: "APP_ENV",
                message,
            })?;

        let api_key = std::env::var("GIGACHAT_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(SettingsError::MissingVariable("GIGACHAT_API_KEY"))?;

        let gigachat_defaults = GigaChatConfig::default();

        Ok(Self {
            environment,
            server: ServerSettings {
                host: env_or("HOST", "0.0.0.0"),
                port: env_parse("PORT", 8000)?,
            },
            gigachat: GigaChatSettings {
                auth_url: env_or("GIGACHAT_AUTH_URL", &gigachat_defaults.auth_url),
                api_url: env_or("GIGACHAT_API_URL", &gigachat_defaults.api_url),
                model: env_or("GIGACHAT_MODEL", &gigachat_defaults.model),
                scope: env_or("GIGACHAT_SCOPE", &gigachat_defaults.scope),
                api_key,
                accept_invalid_certs: env_flag("GIGACHAT_INSECURE_TLS"),
            },
            recognition: RecognitionSettings {
                default_model: env_or("WHISPER_DEFAULT_MODEL", "base"),
                device: env_parse("WHISPER_DEVICE", DevicePreference::Auto)?,
            },
            synthesis: SynthesisSettings {
                server_url: env_or("TTS_SERVER_URL", "http://localhost:8010"),
                output_dir: env_or("TTS_OUTPUT_DIR", "tts_output"),
            },
            uploads: UploadSettings {
                dir: env_or("UPLOAD_DIR", "uploads"),
                max_file_size_mb: env_parse("MAX_UPLOAD_MB", 2048)?,
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}

fn env_parse<T>(name: &'static str, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| SettingsError::InvalidValue {
            name,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
