use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use candle_core::Device;
use serde::Deserialize;

use crate::application::ports::{ModelLoadError, RecognitionModel, RecognitionModelLoader};
use crate::infrastructure::audio::whisper_model::CandleWhisperModel;

/// Catalog entry for a known Whisper checkpoint. The resource figures are
/// the ones published alongside the original checkpoints and are surfaced
/// as-is through the models endpoint.
#[derive(Debug, Clone, Copy)]
pub struct WhisperModelInfo {
    pub identifier: &'static str,
    pub repo: &'static str,
    pub parameters: &'static str,
    pub vram: &'static str,
    pub relative_speed: &'static str,
    pub quality: &'static str,
}

pub const WHISPER_MODELS: &[WhisperModelInfo] = &[
    WhisperModelInfo {
        identifier: "tiny",
        repo: "openai/whisper-tiny",
        parameters: "39M",
        vram: "~1 GB",
        relative_speed: "~32x",
        quality: "Low",
    },
    WhisperModelInfo {
        identifier: "base",
        repo: "openai/whisper-base",
        parameters: "74M",
        vram: "~1 GB",
        relative_speed: "~16x",
        quality: "Basic",
    },
    WhisperModelInfo {
        identifier: "small",
        repo: "openai/whisper-small",
        parameters: "244M",
        vram: "~2 GB",
        relative_speed: "~6x",
        quality: "Medium",
    },
    WhisperModelInfo {
        identifier: "medium",
        repo: "openai/whisper-medium",
        parameters: "769M",
        vram: "~5 GB",
        relative_speed: "~2x",
        quality: "Good",
    },
    WhisperModelInfo {
        identifier: "large",
        repo: "openai/whisper-large-v3",
        parameters: "1550M",
        vram: "~10 GB",
        relative_speed: "1x",
        quality: "Best",
    },
    WhisperModelInfo {
        identifier: "turbo",
        repo: "openai/whisper-large-v3-turbo",
        parameters: "809M",
        vram: "~6 GB",
        relative_speed: "~8x",
        quality: "Optimized",
    },
];

pub fn whisper_model_info(identifier: &str) -> Option<&'static WhisperModelInfo> {
    WHISPER_MODELS.iter().find(|m| m.identifier == identifier)
}

pub fn cuda_available() -> bool {
    candle_core::utils::cuda_is_available()
}

/// Where inference should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    #[default]
    Auto,
    Cpu,
    Cuda,
}

impl FromStr for DevicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cpu" => Ok(DevicePreference::Cpu),
            "cuda" | "gpu" => Ok(DevicePreference::Cuda),
            other => Err(format!("Invalid device preference: {}", other)),
        }
    }
}

pub(crate) fn select_device(preference: DevicePreference) -> Result<Device, ModelLoadError> {
    match preference {
        DevicePreference::Cpu => Ok(Device::Cpu),
        DevicePreference::Cuda => Device::new_cuda(0)
            .map_err(|e| ModelLoadError::InitializationFailed(format!("cuda device: {}", e))),
        DevicePreference::Auto => Ok(Device::cuda_if_available(0).unwrap_or(Device::Cpu)),
    }
}

/// Loads Whisper checkpoints from the Hugging Face hub and initializes them
/// on the configured device.
pub struct CandleWhisperLoader {
    device_preference: DevicePreference,
}

impl CandleWhisperLoader {
    pub fn new(device_preference: DevicePreference) -> Self {
        Self { device_preference }
    }
}

#[async_trait]
impl RecognitionModelLoader for CandleWhisperLoader {
    async fn load(
        &self,
        identifier: &str,
    ) -> Result<Arc<dyn RecognitionModel>, ModelLoadError> {
        let info = whisper_model_info(identifier)
            .ok_or_else(|| ModelLoadError::UnknownIdentifier(identifier.to_string()))?;

        let preference = self.device_preference;
        let identifier = identifier.to_string();
        let repo = info.repo;

        // Weight download and deserialization can take minutes on first
        // use; keep them off the async workers.
        let model = tokio::task::spawn_blocking(move || {
            CandleWhisperModel::load(&identifier, repo, preference)
        })
        .await
        .map_err(|e| ModelLoadError::InitializationFailed(format!("load task: {}", e)))??;

        Ok(Arc::new(model))
    }
}
