use crate::domain::PipelineTask;

/// Language codes offered as translation targets. Each has a display name
/// in [`language_name`].
pub const TRANSLATION_LANGUAGES: &[&str] = &["ru", "en", "de", "fr", "es", "ja", "ko"];

const CORRECT_PROMPT: &str = "You are an editor for speech recognition output. \
Fix punctuation, capitalization and obvious recognition mistakes without \
changing the meaning or the language of the text. Return only the corrected text.";

const SUMMARIZE_PROMPT: &str = "You are an assistant that summarizes transcripts. \
Write a concise summary that keeps the key points, names and decisions. \
Answer in the language of the original text.";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("task {0} has no rewrite prompt")]
    UnmappedTask(PipelineTask),
    #[error("translation requires a target language")]
    MissingTargetLanguage,
}

/// Map a rewrite task to its system prompt. Pure: the same task and target
/// language always yield the same prompt. The plain transcribe task has no
/// prompt and asking for one is a configuration error, not a silent no-op.
pub fn system_prompt(
    task: PipelineTask,
    target_language: Option<&str>,
) -> Result<String, PromptError> {
    match task {
        PipelineTask::Transcribe => Err(PromptError::UnmappedTask(task)),
        PipelineTask::Correct => Ok(CORRECT_PROMPT.to_string()),
        PipelineTask::Summarize => Ok(SUMMARIZE_PROMPT.to_string()),
        PipelineTask::Translate => {
            let target = target_language.ok_or(PromptError::MissingTargetLanguage)?;
            Ok(format!(
                "You are a professional translator. Translate the user's text \
                 into {}. Preserve the tone and meaning and return only the \
                 translation.",
                language_name(target)
            ))
        }
    }
}

/// Human-readable name for the language codes the UI offers. Unknown codes
/// pass through unchanged so the prompt still names the requested target.
pub fn language_name(code: &str) -> &str {
    match code {
        "ru" => "Russian",
        "en" => "English",
        "de" => "German",
        "fr" => "French",
        "es" => "Spanish",
        "ja" => "Japanese",
        "ko" => "Korean",
        other => other,
    }
}
