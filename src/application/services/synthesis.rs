use std::io::Cursor;
use std::sync::Arc;

use crate::application::ports::{
    MediaStore, MediaStoreError, ModelLoadError, SynthesisError, SynthesisModel,
};
use crate::domain::{InvalidStoragePath, StoragePath, VoiceCatalog};

use super::model_cache::ModelCache;

/// Text-to-speech stage. Validates the language against the voice catalog,
/// resolves the speaker (unknown speakers fall back to the first one
/// configured for the language), renders PCM through the resident model and
/// stores the result as a WAV artifact under a collision-safe name.
pub struct SpeechSynthesisService {
    catalog: VoiceCatalog,
    models: Arc<ModelCache>,
    artifacts: Arc<dyn MediaStore>,
}

/// What a successful synthesis call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechArtifact {
    pub filename: String,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

impl SpeechSynthesisService {
    pub fn new(
        catalog: VoiceCatalog,
        models: Arc<ModelCache>,
        artifacts: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            catalog,
            models,
            artifacts,
        }
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        speaker: Option<&str>,
    ) -> Result<SpeechArtifact, SpeechSynthesisError> {
        let profile = self
            .catalog
            .profile(language)
            .ok_or_else(|| SpeechSynthesisError::UnsupportedLanguage(language.to_string()))?;

        let speaker_id = match speaker {
            Some(requested) => match profile.speaker(requested) {
                Some(known) => known.id.clone(),
                None => {
                    let fallback = profile.first_speaker().ok_or_else(|| {
                        SpeechSynthesisError::NoConfiguredSpeakers(language.to_string())
                    })?;
                    tracing::warn!(
                        requested = requested,
                        fallback = %fallback.id,
                        language = language,
                        "Unknown speaker, substituting first configured speaker"
                    );
                    fallback.id.clone()
                }
            },
            None => {
                let first = profile.first_speaker().ok_or_else(|| {
                    SpeechSynthesisError::NoConfiguredSpeakers(language.to_string())
                })?;
                first.id.clone()
            }
        };

        let model = self.models.synthesis(language, &profile.model_id).await?;
        let samples = model.synthesize(text, &speaker_id).await?;
        let sample_rate = model.sample_rate();

        let wav = encode_wav(&samples, sample_rate)
            .map_err(|e| SpeechSynthesisError::Encoding(e.to_string()))?;

        let filename = artifact_filename(language);
        let path = StoragePath::new(&filename)?;
        self.artifacts.store(&path, wav.into()).await?;

        let duration_secs = samples.len() as f64 / f64::from(sample_rate);

        tracing::info!(
            language = language,
            speaker = %speaker_id,
            filename = %filename,
            duration_secs = duration_secs,
            "Speech synthesis completed"
        );

        Ok(SpeechArtifact {
            filename,
            sample_rate,
            duration_secs,
        })
    }
}

/// Artifact name carrying a UTC timestamp for humans and a random suffix
/// for uniqueness across concurrent requests within the same second.
pub fn artifact_filename(language: &str) -> String {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!("tts_{}_{}_{}.wav", language, stamp, &token[..12])
}

fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * f32::from(i16::MAX)) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechSynthesisError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("no speakers configured for language: {0}")]
    NoConfiguredSpeakers(String),
    #[error("model load failed: {0}")]
    ModelLoad(#[from] ModelLoadError),
    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("invalid artifact name: {0}")]
    InvalidName(#[from] InvalidStoragePath),
    #[error("artifact encoding failed: {0}")]
    Encoding(String),
    #[error("artifact storage failed: {0}")]
    Storage(#[from] MediaStoreError),
}
