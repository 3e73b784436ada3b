use async_trait::async_trait;

/// A resident speech-synthesis voice model for one language.
#[async_trait]
pub trait SynthesisModel: Send + Sync {
    /// Render `text` with the given speaker, returning mono f32 PCM at
    /// `sample_rate()`.
    async fn synthesize(&self, text: &str, speaker: &str) -> Result<Vec<f32>, SynthesisError>;

    fn sample_rate(&self) -> u32;
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("synthesis invocation failed: {0}")]
    InvocationFailed(String),
    #[error("synthesis produced invalid audio: {0}")]
    InvalidAudio(String),
}
