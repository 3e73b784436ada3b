use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::ports::{MediaStore, MediaStoreError};
use crate::application::services::SpeechSynthesisError;
use crate::domain::StoragePath;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub speaker: Option<String>,
}

fn default_language() -> String {
    "ru".to_string()
}

#[derive(Serialize)]
pub struct SynthesizeResponse {
    pub filename: String,
    pub audio_url: String,
    pub duration_secs: f64,
}

#[derive(Serialize)]
pub struct VoicesResponse {
    pub languages: Vec<LanguageVoices>,
}

#[derive(Serialize)]
pub struct LanguageVoices {
    pub language: String,
    pub display_name: String,
    pub default_speaker: String,
    pub speakers: Vec<SpeakerDescriptor>,
}

#[derive(Serialize)]
pub struct SpeakerDescriptor {
    pub id: String,
    pub display_name: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

#[tracing::instrument(skip(state, request))]
pub async fn synthesize_handler(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> impl IntoResponse {
    if request.text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Text must not be empty");
    }

    let language = request.language.trim().to_lowercase();

    match state
        .synthesis
        .synthesize(&request.text, &language, request.speaker.as_deref())
        .await
    {
        Ok(artifact) => (
            StatusCode::OK,
            Json(SynthesizeResponse {
                audio_url: format!("/api/v1/speech/audio/{}", artifact.filename),
                filename: artifact.filename,
                duration_secs: artifact.duration_secs,
            }),
        )
            .into_response(),
        Err(SpeechSynthesisError::UnsupportedLanguage(language)) => {
            let supported: Vec<&str> = state
                .synthesis
                .catalog()
                .profiles()
                .iter()
                .map(|p| p.language.as_str())
                .collect();
            tracing::warn!(language = %language, "Rejected unsupported synthesis language");
            error_response(
                StatusCode::BAD_REQUEST,
                format!(
                    "Unsupported language: {}. Supported: {}",
                    language,
                    supported.join(", ")
                ),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Speech synthesis failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Speech synthesis failed: {}", e),
            )
        }
    }
}

/// Lists the languages and speakers available for synthesis.
pub async fn voices_handler(State(state): State<AppState>) -> impl IntoResponse {
    let languages = state
        .synthesis
        .catalog()
        .profiles()
        .iter()
        .map(|profile| LanguageVoices {
            language: profile.language.clone(),
            display_name: profile.display_name.clone(),
            default_speaker: profile
                .first_speaker()
                .map(|s| s.id.clone())
                .unwrap_or_default(),
            speakers: profile
                .speakers
                .iter()
                .map(|s| SpeakerDescriptor {
                    id: s.id.clone(),
                    display_name: s.display_name.clone(),
                })
                .collect(),
        })
        .collect();

    (StatusCode::OK, Json(VoicesResponse { languages }))
}

/// Serves a previously synthesized artifact as a download. The filename is
/// validated as a single path segment before it touches storage.
#[tracing::instrument(skip(state))]
pub async fn speech_audio_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> impl IntoResponse {
    let path = match StoragePath::new(&filename) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(filename = %filename, error = %e, "Rejected artifact filename");
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid filename: {}", e));
        }
    };

    match state.artifacts.fetch(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "audio/wav".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(MediaStoreError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "Audio file not found")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read artifact");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read audio file: {}", e),
            )
        }
    }
}
