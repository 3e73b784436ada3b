use std::sync::Arc;

use async_trait::async_trait;

use super::recognition_model::RecognitionModel;
use super::synthesis_model::SynthesisModel;

/// Instantiates recognition models from a catalog identifier. Loading may
/// block for a long time (weight download, deserialization) and is only
/// ever driven through the model cache, which serializes it per kind.
#[async_trait]
pub trait RecognitionModelLoader: Send + Sync {
    async fn load(&self, identifier: &str) -> Result<Arc<dyn RecognitionModel>, ModelLoadError>;
}

/// Instantiates the synthesis model serving one language.
#[async_trait]
pub trait SynthesisModelLoader: Send + Sync {
    async fn load(
        &self,
        language: &str,
        identifier: &str,
    ) -> Result<Arc<dyn SynthesisModel>, ModelLoadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("unknown model identifier: {0}")]
    UnknownIdentifier(String),
    #[error("model download failed: {0}")]
    DownloadFailed(String),
    #[error("model initialization failed: {0}")]
    InitializationFailed(String),
}
