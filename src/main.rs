use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use myna::application::ports::MediaStore;
use myna::application::services::{
    ModelCache, PipelineOrchestrator, SpeechSynthesisService, TextProcessor, TranscriptionStage,
};
use myna::domain::VoiceCatalog;
use myna::infrastructure::audio::CandleWhisperLoader;
use myna::infrastructure::llm::{CredentialBroker, GigaChatClient};
use myna::infrastructure::observability::{init_tracing, TracingConfig};
use myna::infrastructure::storage::LocalMediaStore;
use myna::infrastructure::tts::{SileroHttpLoader, SileroTtsConfig};
use myna::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;

    init_tracing(
        TracingConfig {
            environment: settings.environment.to_string(),
            ..TracingConfig::default()
        },
        settings.server.port,
    );

    let gigachat_config = settings.gigachat.client_config();
    let credentials = Arc::new(CredentialBroker::new(&gigachat_config)?);
    let chat = Arc::new(GigaChatClient::new(&gigachat_config, credentials)?);

    let recognition_loader = Arc::new(CandleWhisperLoader::new(settings.recognition.device));
    let synthesis_loader = Arc::new(SileroHttpLoader::new(&SileroTtsConfig {
        base_url: settings.synthesis.server_url.clone(),
        ..SileroTtsConfig::default()
    })?);
    let models = Arc::new(ModelCache::new(recognition_loader, synthesis_loader));

    let uploads: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::new(&settings.uploads.dir)?);
    let artifacts: Arc<dyn MediaStore> =
        Arc::new(LocalMediaStore::new(&settings.synthesis.output_dir)?);

    let pipeline = Arc::new(PipelineOrchestrator::new(
        TranscriptionStage::new(Arc::clone(&models)),
        TextProcessor::new(chat),
    ));

    let synthesis = Arc::new(SpeechSynthesisService::new(
        VoiceCatalog::silero_defaults(),
        Arc::clone(&models),
        Arc::clone(&artifacts),
    ));

    let state = AppState {
        pipeline,
        synthesis,
        uploads,
        artifacts,
        default_recognition_model: settings.recognition.default_model.clone(),
        max_upload_bytes: settings.uploads.max_file_size_bytes(),
    };

    let router = create_router(state);

    let addr: SocketAddr =
        format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
