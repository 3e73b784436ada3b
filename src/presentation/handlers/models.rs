use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::services::{language_name, TRANSLATION_LANGUAGES};
use crate::domain::PipelineTask;
use crate::infrastructure::audio::{cuda_available, WHISPER_MODELS};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelDescriptor>,
    pub default_model: String,
    pub languages: Vec<LanguageDescriptor>,
    pub tasks: Vec<TaskDescriptor>,
    pub gpu_available: bool,
}

#[derive(Serialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub parameters: String,
    pub vram: String,
    pub speed: String,
    pub quality: String,
}

#[derive(Serialize)]
pub struct LanguageDescriptor {
    pub code: String,
    pub display_name: String,
}

#[derive(Serialize)]
pub struct TaskDescriptor {
    pub id: String,
    pub display_name: String,
}

fn task_label(task: PipelineTask) -> &'static str {
    match task {
        PipelineTask::Transcribe => "Transcription only",
        PipelineTask::Correct => "Correction and formatting",
        PipelineTask::Summarize => "Summarization",
        PipelineTask::Translate => "Translation",
    }
}

/// Lists the recognition models this deployment can serve, along with the
/// translation targets and tasks the pipeline accepts.
pub async fn models_handler(State(state): State<AppState>) -> impl IntoResponse {
    let models = WHISPER_MODELS
        .iter()
        .map(|info| ModelDescriptor {
            id: info.identifier.to_string(),
            parameters: info.parameters.to_string(),
            vram: info.vram.to_string(),
            speed: info.relative_speed.to_string(),
            quality: info.quality.to_string(),
        })
        .collect();

    let languages = TRANSLATION_LANGUAGES
        .iter()
        .map(|code| LanguageDescriptor {
            code: code.to_string(),
            display_name: language_name(code).to_string(),
        })
        .collect();

    let tasks = PipelineTask::ALL
        .iter()
        .map(|task| TaskDescriptor {
            id: task.as_str().to_string(),
            display_name: task_label(*task).to_string(),
        })
        .collect();

    (
        StatusCode::OK,
        Json(ModelsResponse {
            models,
            default_model: state.default_recognition_model.clone(),
            languages,
            tasks,
            gpu_available: cuda_available(),
        }),
    )
}
