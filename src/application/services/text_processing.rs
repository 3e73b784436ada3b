use std::sync::Arc;

use crate::application::ports::{ChatClientError, ChatCompletionClient};
use crate::domain::PipelineTask;

use super::prompt::{system_prompt, PromptError};

/// Rewrites a transcript through the remote chat endpoint: correction,
/// summarization or translation, selected by task.
pub struct TextProcessor {
    chat: Arc<dyn ChatCompletionClient>,
}

impl TextProcessor {
    pub fn new(chat: Arc<dyn ChatCompletionClient>) -> Self {
        Self { chat }
    }

    /// Only rewrite tasks reach this stage; the orchestrator routes the
    /// plain transcribe task around it.
    pub async fn process(
        &self,
        text: &str,
        task: PipelineTask,
        target_language: Option<&str>,
    ) -> Result<String, TextProcessingError> {
        let prompt = system_prompt(task, target_language)?;

        tracing::debug!(task = %task, input_chars = text.len(), "Requesting transcript rewrite");

        let rewritten = self.chat.complete(&prompt, text).await?;

        tracing::info!(
            task = %task,
            input_chars = text.len(),
            output_chars = rewritten.len(),
            "Text processing completed"
        );

        Ok(rewritten)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TextProcessingError {
    #[error("prompt selection failed: {0}")]
    Prompt(#[from] PromptError),
    #[error("chat completion failed: {0}")]
    Chat(#[from] ChatClientError),
}
