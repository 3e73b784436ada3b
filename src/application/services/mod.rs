mod model_cache;
mod pipeline;
mod prompt;
mod synthesis;
mod text_processing;
mod transcription;

pub use model_cache::ModelCache;
pub use pipeline::{PipelineError, PipelineOrchestrator, PipelineOutcome, PipelineRequest};
pub use prompt::{PromptError, TRANSLATION_LANGUAGES, language_name, system_prompt};
pub use synthesis::{
    SpeechArtifact, SpeechSynthesisError, SpeechSynthesisService, artifact_filename,
};
pub use text_processing::{TextProcessingError, TextProcessor};
pub use transcription::{TranscriptionError, TranscriptionStage};
