use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    ModelLoadError, SynthesisError, SynthesisModel, SynthesisModelLoader,
};

/// Connection settings for the Silero synthesis sidecar.
#[derive(Debug, Clone)]
pub struct SileroTtsConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for SileroTtsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8010".to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Serialize)]
struct LoadModelRequest<'a> {
    language: &'a str,
    model_id: &'a str,
}

#[derive(Deserialize)]
struct LoadModelResponse {
    model_id: String,
    sample_rate: u32,
}

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    model_id: &'a str,
    text: &'a str,
    speaker: &'a str,
    sample_rate: u32,
}

/// Asks the sidecar to load a voice model and hands back a handle bound to
/// it. The sidecar downloads voice weights on first load, so the request
/// timeout is generous.
pub struct SileroHttpLoader {
    http: reqwest::Client,
    base_url: String,
}

impl SileroHttpLoader {
    pub fn new(config: &SileroTtsConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SynthesisModelLoader for SileroHttpLoader {
    async fn load(
        &self,
        language: &str,
        identifier: &str,
    ) -> Result<Arc<dyn SynthesisModel>, ModelLoadError> {
        let url = format!("{}/models", self.base_url);

        tracing::info!(language = language, model = identifier, "Loading synthesis model");

        let response = self
            .http
            .post(&url)
            .json(&LoadModelRequest {
                language,
                model_id: identifier,
            })
            .send()
            .await
            .map_err(|e| ModelLoadError::DownloadFailed(format!("synthesis sidecar: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ModelLoadError::UnknownIdentifier(identifier.to_string()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ModelLoadError::InitializationFailed(format!(
                "synthesis sidecar returned {}: {}",
                status, body
            )));
        }

        let loaded: LoadModelResponse = response
            .json()
            .await
            .map_err(|e| ModelLoadError::InitializationFailed(format!("sidecar response: {}", e)))?;

        tracing::info!(
            model = %loaded.model_id,
            sample_rate = loaded.sample_rate,
            "Synthesis model ready"
        );

        Ok(Arc::new(SileroHttpModel {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            model_id: loaded.model_id,
            sample_rate: loaded.sample_rate,
        }))
    }
}

/// Handle to one voice model resident in the sidecar.
pub struct SileroHttpModel {
    http: reqwest::Client,
    base_url: String,
    model_id: String,
    sample_rate: u32,
}

#[async_trait]
impl SynthesisModel for SileroHttpModel {
    async fn synthesize(&self, text: &str, speaker: &str) -> Result<Vec<f32>, SynthesisError> {
        let url = format!("{}/synthesize", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&SynthesizeRequest {
                model_id: &self.model_id,
                text,
                speaker,
                sample_rate: self.sample_rate,
            })
            .send()
            .await
            .map_err(|e| SynthesisError::InvocationFailed(format!("synthesis request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SynthesisError::InvocationFailed(format!(
                "synthesis sidecar returned {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvocationFailed(format!("synthesis body: {}", e)))?;

        let (samples, wav_rate) = decode_wav_samples(&bytes)?;
        if wav_rate != self.sample_rate {
            tracing::warn!(
                declared = self.sample_rate,
                actual = wav_rate,
                "Sidecar returned audio at an unexpected sample rate"
            );
        }

        Ok(samples)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

fn decode_wav_samples(bytes: &[u8]) -> Result<(Vec<f32>, u32), SynthesisError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| SynthesisError::InvalidAudio(format!("wav header: {}", e)))?;

    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(SynthesisError::InvalidAudio(format!(
            "expected mono audio, got {} channels",
            spec.channels
        )));
    }

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| SynthesisError::InvalidAudio(format!("wav samples: {}", e)))?,
        (hound::SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| SynthesisError::InvalidAudio(format!("wav samples: {}", e)))?,
        (format, bits) => {
            return Err(SynthesisError::InvalidAudio(format!(
                "unsupported sample format {:?}/{} bit",
                format, bits
            )));
        }
    };

    Ok((samples, spec.sample_rate))
}
