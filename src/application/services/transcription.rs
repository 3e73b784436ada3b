use std::sync::Arc;

use crate::application::ports::{ModelLoadError, RecognitionError, RecognitionModel};
use crate::domain::Transcript;

use super::model_cache::ModelCache;

/// Speech-to-text stage. Makes sure the requested recognition model is
/// resident (loading or swapping through the cache when it is not) and runs
/// it over the uploaded bytes.
pub struct TranscriptionStage {
    models: Arc<ModelCache>,
}

impl TranscriptionStage {
    pub fn new(models: Arc<ModelCache>) -> Self {
        Self { models }
    }

    pub async fn transcribe(
        &self,
        audio: &[u8],
        model_identifier: &str,
        language_hint: Option<&str>,
    ) -> Result<Transcript, TranscriptionError> {
        let model = self.models.recognition(model_identifier).await?;
        let transcript = model.transcribe(audio, language_hint).await?;

        tracing::info!(
            model = model_identifier,
            chars = transcript.text.len(),
            language = transcript.language.as_deref().unwrap_or("unknown"),
            "Transcription completed"
        );

        Ok(transcript)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("model load failed: {0}")]
    ModelLoad(#[from] ModelLoadError),
    #[error("recognition failed: {0}")]
    Recognition(#[from] RecognitionError),
}
