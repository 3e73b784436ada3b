use std::sync::Arc;

use crate::application::ports::MediaStore;
use crate::application::services::{PipelineOrchestrator, SpeechSynthesisService};

/// Shared handles for the HTTP layer. Cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PipelineOrchestrator>,
    pub synthesis: Arc<SpeechSynthesisService>,
    pub uploads: Arc<dyn MediaStore>,
    pub artifacts: Arc<dyn MediaStore>,
    pub default_recognition_model: String,
    pub max_upload_bytes: usize,
}
