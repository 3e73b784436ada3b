use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex, Weak};
use std::time::Duration;

use myna::application::ports::{
    ModelLoadError, RecognitionError, RecognitionModel, RecognitionModelLoader, SynthesisError,
    SynthesisModel, SynthesisModelLoader,
};
use myna::application::services::ModelCache;
use myna::domain::Transcript;

struct StubRecognitionModel;

#[async_trait::async_trait]
impl RecognitionModel for StubRecognitionModel {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _language_hint: Option<&str>,
    ) -> Result<Transcript, RecognitionError> {
        Ok(Transcript::new("ok", None))
    }
}

struct StubSynthesisModel;

#[async_trait::async_trait]
impl SynthesisModel for StubSynthesisModel {
    async fn synthesize(&self, _text: &str, _speaker: &str) -> Result<Vec<f32>, SynthesisError> {
        Ok(vec![0.0; 480])
    }

    fn sample_rate(&self) -> u32 {
        48_000
    }
}

#[derive(Default)]
struct CountingRecognitionLoader {
    loads: AtomicUsize,
    delay: Option<Duration>,
}

#[async_trait::async_trait]
impl RecognitionModelLoader for CountingRecognitionLoader {
    async fn load(&self, _identifier: &str) -> Result<Arc<dyn RecognitionModel>, ModelLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(Arc::new(StubRecognitionModel))
    }
}

#[derive(Default)]
struct CountingSynthesisLoader {
    loads: AtomicUsize,
}

#[async_trait::async_trait]
impl SynthesisModelLoader for CountingSynthesisLoader {
    async fn load(
        &self,
        _language: &str,
        _identifier: &str,
    ) -> Result<Arc<dyn SynthesisModel>, ModelLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(StubSynthesisModel))
    }
}

/// Records, at each load, whether the model handed out by the previous load
/// was still alive when the new one was requested.
#[derive(Default)]
struct ReleaseProbeLoader {
    previous: StdMutex<Option<Weak<dyn RecognitionModel>>>,
    prior_alive: StdMutex<Vec<bool>>,
}

#[async_trait::async_trait]
impl RecognitionModelLoader for ReleaseProbeLoader {
    async fn load(&self, _identifier: &str) -> Result<Arc<dyn RecognitionModel>, ModelLoadError> {
        if let Some(weak) = self.previous.lock().unwrap().as_ref() {
            self.prior_alive
                .lock()
                .unwrap()
                .push(weak.upgrade().is_some());
        }
        let model: Arc<dyn RecognitionModel> = Arc::new(StubRecognitionModel);
        *self.previous.lock().unwrap() = Some(Arc::downgrade(&model));
        Ok(model)
    }
}

/// Fails on the first call, succeeds afterwards.
#[derive(Default)]
struct FlakyRecognitionLoader {
    attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl RecognitionModelLoader for FlakyRecognitionLoader {
    async fn load(&self, _identifier: &str) -> Result<Arc<dyn RecognitionModel>, ModelLoadError> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(ModelLoadError::DownloadFailed(
                "connection reset".to_string(),
            ));
        }
        Ok(Arc::new(StubRecognitionModel))
    }
}

fn cache_with(
    recognition: Arc<dyn RecognitionModelLoader>,
    synthesis: Arc<dyn SynthesisModelLoader>,
) -> ModelCache {
    ModelCache::new(recognition, synthesis)
}

#[tokio::test]
async fn given_same_identifier_when_requested_twice_then_loader_runs_once() {
    let loader = Arc::new(CountingRecognitionLoader::default());
    let cache = cache_with(Arc::clone(&loader) as _, Arc::new(CountingSynthesisLoader::default()));

    cache.recognition("base").await.unwrap();
    cache.recognition("base").await.unwrap();

    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    assert_eq!(cache.resident_recognition().await.as_deref(), Some("base"));
}

#[tokio::test]
async fn given_different_identifier_when_requested_then_resident_model_is_swapped() {
    let loader = Arc::new(CountingRecognitionLoader::default());
    let cache = cache_with(Arc::clone(&loader) as _, Arc::new(CountingSynthesisLoader::default()));

    cache.recognition("base").await.unwrap();
    cache.recognition("small").await.unwrap();
    cache.recognition("base").await.unwrap();

    assert_eq!(loader.loads.load(Ordering::SeqCst), 3);
    assert_eq!(cache.resident_recognition().await.as_deref(), Some("base"));
}

#[tokio::test]
async fn given_model_swap_when_new_load_starts_then_old_handle_is_already_released() {
    let probe = Arc::new(ReleaseProbeLoader::default());
    let cache = cache_with(Arc::clone(&probe) as _, Arc::new(CountingSynthesisLoader::default()));

    let first = cache.recognition("base").await.unwrap();
    drop(first);
    let _second = cache.recognition("small").await.unwrap();

    let observed = probe.prior_alive.lock().unwrap().clone();
    assert_eq!(observed, vec![false]);
}

#[tokio::test]
async fn given_failed_load_when_retried_then_loader_runs_again() {
    let loader = Arc::new(FlakyRecognitionLoader::default());
    let cache = cache_with(Arc::clone(&loader) as _, Arc::new(CountingSynthesisLoader::default()));

    let first = cache.recognition("base").await;
    assert!(matches!(first, Err(ModelLoadError::DownloadFailed(_))));
    assert_eq!(cache.resident_recognition().await, None);

    let second = cache.recognition("base").await;
    assert!(second.is_ok());
    assert_eq!(loader.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn given_concurrent_misses_for_same_model_then_single_load_happens() {
    let loader = Arc::new(CountingRecognitionLoader {
        loads: AtomicUsize::new(0),
        delay: Some(Duration::from_millis(50)),
    });
    let cache = Arc::new(cache_with(
        Arc::clone(&loader) as _,
        Arc::new(CountingSynthesisLoader::default()),
    ));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache.recognition("base").await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_multiple_languages_when_synthesized_then_each_language_loads_once() {
    let synthesis = Arc::new(CountingSynthesisLoader::default());
    let cache = cache_with(
        Arc::new(CountingRecognitionLoader::default()),
        Arc::clone(&synthesis) as _,
    );

    cache.synthesis("ru", "v4_ru").await.unwrap();
    cache.synthesis("ru", "v4_ru").await.unwrap();
    cache.synthesis("en", "v3_en").await.unwrap();
    cache.synthesis("ru", "v4_ru").await.unwrap();
    cache.synthesis("en", "v3_en").await.unwrap();

    assert_eq!(synthesis.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn given_loaded_models_when_cleared_then_nothing_stays_resident() {
    let cache = cache_with(
        Arc::new(CountingRecognitionLoader::default()),
        Arc::new(CountingSynthesisLoader::default()),
    );

    cache.recognition("base").await.unwrap();
    cache.clear().await;

    assert_eq!(cache.resident_recognition().await, None);
}
