use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use myna::application::ports::{
    ChatClientError, ChatCompletionClient, ModelLoadError, RecognitionError, RecognitionModel,
    RecognitionModelLoader, SynthesisModel, SynthesisModelLoader,
};
use myna::application::services::{
    ModelCache, PipelineError, PipelineOrchestrator, PipelineRequest, TextProcessor,
    TranscriptionStage,
};
use myna::domain::{PipelineTask, Transcript};

const RAW_TRANSCRIPT: &str = "эм ну короче говоря привет";

struct StubRecognitionModel {
    fail: bool,
}

#[async_trait::async_trait]
impl RecognitionModel for StubRecognitionModel {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _language_hint: Option<&str>,
    ) -> Result<Transcript, RecognitionError> {
        if self.fail {
            return Err(RecognitionError::DecodingFailed(
                "unreadable container".to_string(),
            ));
        }
        Ok(Transcript::new(RAW_TRANSCRIPT, Some("ru".to_string())))
    }
}

struct StubRecognitionLoader {
    fail_model: bool,
}

#[async_trait::async_trait]
impl RecognitionModelLoader for StubRecognitionLoader {
    async fn load(&self, _identifier: &str) -> Result<Arc<dyn RecognitionModel>, ModelLoadError> {
        Ok(Arc::new(StubRecognitionModel {
            fail: self.fail_model,
        }))
    }
}

struct UnusedSynthesisLoader;

#[async_trait::async_trait]
impl SynthesisModelLoader for UnusedSynthesisLoader {
    async fn load(
        &self,
        _language: &str,
        _identifier: &str,
    ) -> Result<Arc<dyn SynthesisModel>, ModelLoadError> {
        Err(ModelLoadError::UnknownIdentifier("unused".to_string()))
    }
}

#[derive(Default)]
struct RecordingChatClient {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl ChatCompletionClient for RecordingChatClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_text: &str,
    ) -> Result<String, ChatClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Очищено: {}", user_text))
    }
}

struct FailingChatClient;

#[async_trait::async_trait]
impl ChatCompletionClient for FailingChatClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_text: &str,
    ) -> Result<String, ChatClientError> {
        Err(ChatClientError::ApiRequestFailed("status 502".to_string()))
    }
}

fn orchestrator(fail_model: bool, chat: Arc<dyn ChatCompletionClient>) -> PipelineOrchestrator {
    let models = Arc::new(ModelCache::new(
        Arc::new(StubRecognitionLoader { fail_model }),
        Arc::new(UnusedSynthesisLoader),
    ));
    PipelineOrchestrator::new(TranscriptionStage::new(models), TextProcessor::new(chat))
}

fn request(task: PipelineTask, target_language: Option<&str>) -> PipelineRequest<'_> {
    PipelineRequest {
        audio: b"fake audio",
        model_identifier: "base",
        language_hint: None,
        task,
        target_language,
    }
}

#[tokio::test]
async fn given_transcribe_task_when_run_then_rewrite_stage_is_skipped() {
    let chat = Arc::new(RecordingChatClient::default());
    let orchestrator = orchestrator(false, Arc::clone(&chat) as _);

    let outcome = orchestrator
        .run(request(PipelineTask::Transcribe, None))
        .await
        .unwrap();

    assert_eq!(outcome.transcript, RAW_TRANSCRIPT);
    assert_eq!(outcome.processed_text, RAW_TRANSCRIPT);
    assert_eq!(outcome.detected_language.as_deref(), Some("ru"));
    assert_eq!(outcome.model_used, "base");
    assert_eq!(outcome.llm_seconds, 0.0);
    assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_correct_task_when_run_then_rewrite_stage_is_invoked() {
    let chat = Arc::new(RecordingChatClient::default());
    let orchestrator = orchestrator(false, Arc::clone(&chat) as _);

    let outcome = orchestrator
        .run(request(PipelineTask::Correct, None))
        .await
        .unwrap();

    assert_eq!(outcome.transcript, RAW_TRANSCRIPT);
    assert_eq!(outcome.processed_text, format!("Очищено: {}", RAW_TRANSCRIPT));
    assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_rewrite_failure_when_run_then_transcript_survives_with_error_note() {
    let orchestrator = orchestrator(false, Arc::new(FailingChatClient));

    let outcome = orchestrator
        .run(request(PipelineTask::Summarize, None))
        .await
        .unwrap();

    assert_eq!(outcome.transcript, RAW_TRANSCRIPT);
    assert!(outcome.processed_text.starts_with("Text processing failed:"));
    assert_eq!(outcome.llm_seconds, 0.0);
}

#[tokio::test]
async fn given_recognition_failure_when_run_then_pipeline_fails() {
    let orchestrator = orchestrator(true, Arc::new(RecordingChatClient::default()));

    let result = orchestrator.run(request(PipelineTask::Correct, None)).await;

    assert!(matches!(result, Err(PipelineError::Transcription(_))));
}

#[tokio::test]
async fn given_translate_task_without_target_when_run_then_error_is_contained() {
    let chat = Arc::new(RecordingChatClient::default());
    let orchestrator = orchestrator(false, Arc::clone(&chat) as _);

    let outcome = orchestrator
        .run(request(PipelineTask::Translate, None))
        .await
        .unwrap();

    assert!(outcome.processed_text.starts_with("Text processing failed:"));
    assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_completed_pipeline_when_timings_reported_then_rounded_to_two_decimals() {
    let orchestrator = orchestrator(false, Arc::new(RecordingChatClient::default()));

    let outcome = orchestrator
        .run(request(PipelineTask::Correct, None))
        .await
        .unwrap();

    for seconds in [outcome.asr_seconds, outcome.llm_seconds] {
        let scaled = seconds * 100.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
