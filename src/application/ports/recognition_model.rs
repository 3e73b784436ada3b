use async_trait::async_trait;

use crate::domain::Transcript;

/// A resident speech-recognition model. Handles are shared behind `Arc` and
/// invoked outside the model cache lock; implementations whose decode path
/// is stateful (kv caches and the like) are not reentrant and must
/// serialize invocations internally.
#[async_trait]
pub trait RecognitionModel: Send + Sync {
    /// Transcribe an encoded audio/video byte buffer. `language_hint` is an
    /// ISO 639-1 code; when absent the model detects the language itself.
    async fn transcribe(
        &self,
        audio: &[u8],
        language_hint: Option<&str>,
    ) -> Result<Transcript, RecognitionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("recognition failed: {0}")]
    InvocationFailed(String),
}
