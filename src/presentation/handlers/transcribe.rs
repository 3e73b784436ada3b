use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::MediaStore;
use crate::application::services::PipelineRequest;
use crate::domain::{PipelineTask, StoragePath};
use crate::infrastructure::observability::text_preview;
use crate::presentation::state::AppState;

/// Containers the decoder is known to handle, including video ones whose
/// audio track is extracted.
const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "mp4", "avi", "mov"];

#[derive(Serialize)]
pub struct TranscriptionResponse {
    pub transcript: String,
    pub processed_text: String,
    pub filename: String,
    pub asr_time: f64,
    pub llm_time: f64,
    pub model_used: String,
    pub detected_language: String,
    pub task: String,
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

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file_bytes = None;
    let mut client_filename = String::new();
    let mut model = state.default_recognition_model.clone();
    let mut language_hint: Option<String> = None;
    let mut task_field = "transcribe".to_string();
    let mut target_language: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart body");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart body: {}", e),
                );
            }
        };

        match field.name().unwrap_or_default().to_string().as_str() {
            "file" => {
                client_filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => file_bytes = Some(bytes),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read uploaded file");
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read file: {}", e),
                        );
                    }
                }
            }
            "model" => {
                if let Ok(value) = field.text().await {
                    let value = value.trim().to_string();
                    if !value.is_empty() {
                        model = value;
                    }
                }
            }
            "language" => {
                if let Ok(value) = field.text().await {
                    let value = value.trim().to_lowercase();
                    if !value.is_empty() && value != "auto" {
                        language_hint = Some(value);
                    }
                }
            }
            "task" => {
                if let Ok(value) = field.text().await {
                    let value = value.trim().to_lowercase();
                    if !value.is_empty() {
                        task_field = value;
                    }
                }
            }
            "target_language" => {
                if let Ok(value) = field.text().await {
                    let value = value.trim().to_lowercase();
                    if !value.is_empty() {
                        target_language = Some(value);
                    }
                }
            }
            _ => {}
        }
    }

    let Some(data) = file_bytes else {
        tracing::warn!("Transcription request with no file");
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    if client_filename.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No file selected");
    }

    let extension = match file_extension(&client_filename) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => ext,
        Some(ext) => {
            tracing::warn!(extension = %ext, "Rejected unsupported file format");
            return error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!(
                    "Unsupported file format: .{}. Allowed: {}",
                    ext,
                    ALLOWED_EXTENSIONS.join(", ")
                ),
            );
        }
        None => {
            return error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!(
                    "File has no extension. Allowed: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                ),
            );
        }
    };

    let task = match task_field.parse::<PipelineTask>() {
        Ok(task) => task,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    if task == PipelineTask::Translate && target_language.is_none() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "target_language is required for the translate task",
        );
    }

    let staged_name = format!("{}.{}", Uuid::new_v4(), extension);
    let staged_path = match StoragePath::new(&staged_name) {
        Ok(path) => path,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build staging path");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to stage upload");
        }
    };

    if let Err(e) = state.uploads.store(&staged_path, data.clone()).await {
        tracing::error!(error = %e, "Failed to stage upload");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to stage upload: {}", e),
        );
    }

    tracing::info!(
        filename = %client_filename,
        staged = %staged_path,
        bytes = data.len(),
        model = %model,
        task = %task,
        "Processing transcription request"
    );

    let result = state
        .pipeline
        .run(PipelineRequest {
            audio: &data,
            model_identifier: &model,
            language_hint: language_hint.as_deref(),
            task,
            target_language: target_language.as_deref(),
        })
        .await;

    // The staged copy is removed whether the pipeline succeeded or not.
    if let Err(e) = state.uploads.delete(&staged_path).await {
        tracing::warn!(staged = %staged_path, error = %e, "Failed to remove staged upload");
    }

    match result {
        Ok(outcome) => {
            tracing::debug!(
                transcript = %text_preview(&outcome.transcript),
                "Transcription completed"
            );

            (
                StatusCode::OK,
                Json(TranscriptionResponse {
                    transcript: outcome.transcript,
                    processed_text: outcome.processed_text,
                    filename: client_filename,
                    asr_time: outcome.asr_seconds,
                    llm_time: outcome.llm_seconds,
                    model_used: outcome.model_used,
                    detected_language: outcome
                        .detected_language
                        .unwrap_or_else(|| "unknown".to_string()),
                    task: outcome.task.as_str().to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Transcription pipeline failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Transcription failed: {}", e),
            )
        }
    }
}

fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}
