use std::time::{Duration, Instant};

use crate::domain::PipelineTask;

use super::text_processing::TextProcessor;
use super::transcription::{TranscriptionError, TranscriptionStage};

/// Sequences recognition and the optional rewrite for one upload, timing
/// each stage independently.
pub struct PipelineOrchestrator {
    transcription: TranscriptionStage,
    text_processing: TextProcessor,
}

/// One combined transcription request, built by the web layer.
pub struct PipelineRequest<'a> {
    pub audio: &'a [u8],
    pub model_identifier: &'a str,
    pub language_hint: Option<&'a str>,
    pub task: PipelineTask,
    pub target_language: Option<&'a str>,
}

/// Terminal result of the pipeline. `llm_seconds` is zero whenever the
/// rewrite stage did not run or did not finish.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub transcript: String,
    pub processed_text: String,
    pub detected_language: Option<String>,
    pub model_used: String,
    pub task: PipelineTask,
    pub asr_seconds: f64,
    pub llm_seconds: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),
}

impl PipelineOrchestrator {
    pub fn new(transcription: TranscriptionStage, text_processing: TextProcessor) -> Self {
        Self {
            transcription,
            text_processing,
        }
    }

    /// Run recognition, then the rewrite when the task asks for one.
    /// Recognition failures abort the request; rewrite failures are
    /// contained, leaving the transcript intact and an error note in
    /// `processed_text` with zero recorded rewrite time.
    pub async fn run(
        &self,
        request: PipelineRequest<'_>,
    ) -> Result<PipelineOutcome, PipelineError> {
        let asr_started = Instant::now();
        let transcript = self
            .transcription
            .transcribe(request.audio, request.model_identifier, request.language_hint)
            .await?;
        let asr_seconds = round_seconds(asr_started.elapsed());

        let mut llm_seconds = 0.0;
        let processed_text = if request.task.needs_text_processing() {
            let llm_started = Instant::now();
            match self
                .text_processing
                .process(&transcript.text, request.task, request.target_language)
                .await
            {
                Ok(rewritten) => {
                    llm_seconds = round_seconds(llm_started.elapsed());
                    rewritten
                }
                Err(e) => {
                    tracing::warn!(
                        task = %request.task,
                        error = %e,
                        "Text processing failed, returning raw transcript with error note"
                    );
                    format!("Text processing failed: {}", e)
                }
            }
        } else {
            transcript.text.clone()
        };

        tracing::info!(
            task = %request.task,
            model = request.model_identifier,
            asr_seconds = asr_seconds,
            llm_seconds = llm_seconds,
            "Pipeline completed"
        );

        Ok(PipelineOutcome {
            transcript: transcript.text,
            processed_text,
            detected_language: transcript.language,
            model_used: request.model_identifier.to_string(),
            task: request.task,
            asr_seconds,
            llm_seconds,
        })
    }
}

fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}
