use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::application::ports::{
    ModelLoadError, RecognitionModel, RecognitionModelLoader, SynthesisModel, SynthesisModelLoader,
};
use crate::domain::ModelKey;

/// Process-wide cache of loaded inference models.
///
/// Recognition networks contend for device memory, so at most one is
/// resident: requesting a different identifier releases the previous handle
/// before the new load starts. Synthesis voices are small and accumulate,
/// one handle per language, with no eviction.
///
/// Each kind has its own async lock held across the whole check-then-load
/// sequence, so concurrent misses for the same key collapse into a single
/// loader call. Handles are returned as `Arc` clones and invoked after the
/// lock is released; a failed load leaves nothing resident for that key and
/// a later call may retry.
pub struct ModelCache {
    recognition_loader: Arc<dyn RecognitionModelLoader>,
    synthesis_loader: Arc<dyn SynthesisModelLoader>,
    recognition: Mutex<Option<(ModelKey, Arc<dyn RecognitionModel>)>>,
    synthesis: Mutex<HashMap<String, (ModelKey, Arc<dyn SynthesisModel>)>>,
}

impl ModelCache {
    pub fn new(
        recognition_loader: Arc<dyn RecognitionModelLoader>,
        synthesis_loader: Arc<dyn SynthesisModelLoader>,
    ) -> Self {
        Self {
            recognition_loader,
            synthesis_loader,
            recognition: Mutex::new(None),
            synthesis: Mutex::new(HashMap::new()),
        }
    }

    /// Return the resident recognition model for `identifier`, loading it on
    /// first use and swapping out whatever was resident before.
    pub async fn recognition(
        &self,
        identifier: &str,
    ) -> Result<Arc<dyn RecognitionModel>, ModelLoadError> {
        let key = ModelKey::recognition(identifier);
        let mut slot = self.recognition.lock().await;

        if let Some((resident_key, model)) = slot.as_ref() {
            if *resident_key == key {
                tracing::debug!(model = %key, "Recognition model cache hit");
                return Ok(Arc::clone(model));
            }
        }

        // The old handle is released before the new load so both never
        // occupy device memory at the same time.
        if let Some((old_key, old_model)) = slot.take() {
            tracing::info!(old = %old_key, new = %key, "Releasing resident recognition model");
            drop(old_model);
        }

        tracing::info!(model = %key, "Loading recognition model");
        let model = self.recognition_loader.load(identifier).await?;
        *slot = Some((key, Arc::clone(&model)));

        Ok(model)
    }

    /// Return the synthesis model serving `language`, loading it on first
    /// use. Other languages stay resident.
    pub async fn synthesis(
        &self,
        language: &str,
        identifier: &str,
    ) -> Result<Arc<dyn SynthesisModel>, ModelLoadError> {
        let key = ModelKey::synthesis(identifier, language);
        let mut resident = self.synthesis.lock().await;

        if let Some((resident_key, model)) = resident.get(language) {
            if *resident_key == key {
                tracing::debug!(model = %key, "Synthesis model cache hit");
                return Ok(Arc::clone(model));
            }
        }

        tracing::info!(model = %key, "Loading synthesis model");
        let model = self.synthesis_loader.load(language, identifier).await?;
        resident.insert(language.to_string(), (key, Arc::clone(&model)));

        Ok(model)
    }

    /// Identifier of the currently resident recognition model, if any.
    pub async fn resident_recognition(&self) -> Option<String> {
        let slot = self.recognition.lock().await;
        slot.as_ref().map(|(key, _)| key.identifier().to_string())
    }

    /// Drop every resident handle so device memory is returned before the
    /// process exits.
    pub async fn clear(&self) {
        self.recognition.lock().await.take();
        self.synthesis.lock().await.clear();
    }
}
