use async_trait::async_trait;
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{ModelLoadError, RecognitionError, RecognitionModel};
use crate::domain::Transcript;
use crate::infrastructure::audio::audio_decoder::decode_to_mono_pcm;
use crate::infrastructure::audio::whisper_loader::{select_device, DevicePreference};

/// Repository that hosts the precomputed mel filter banks.
const MEL_FILTER_REPO: &str = "FL33TW00D-HF/whisper-base";

/// Hard cap on tokens decoded per 30 second window.
const MAX_SEGMENT_TOKENS: usize = 224;

/// Language codes the multilingual checkpoints were trained on, in the
/// token id order used by the tokenizer special tokens.
const WHISPER_LANGUAGES: &[&str] = &[
    "en", "zh", "de", "es", "ru", "ko", "fr", "ja", "pt", "tr", "pl", "ca", "nl", "ar", "sv",
    "it", "id", "hi", "fi", "vi", "he", "uk", "el", "ms", "cs", "ro", "da", "hu", "ta", "no",
    "th", "ur", "hr", "bg", "lt", "la", "mi", "ml", "cy", "sk", "te", "fa", "lv", "bn", "sr",
    "az", "sl", "kn", "et", "mk", "br", "eu", "is", "hy", "ne", "mn", "bs", "kk", "sq", "sw",
    "gl", "mr", "pa", "si", "km", "sn", "yo", "so", "af", "oc", "ka", "be", "tg", "sd", "gu",
    "am", "yi", "lo", "uz", "fo", "ht", "ps", "tk", "nn", "mt", "sa", "lb", "my", "bo", "tl",
    "mg", "as", "tt", "haw", "ln", "ha", "ba", "jw", "su",
];

/// A Whisper checkpoint resident on one device. The underlying graph keeps
/// a key-value cache between decoder steps, so invocations are serialized
/// behind a lock.
pub struct CandleWhisperModel {
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
}

impl CandleWhisperModel {
    /// Download (or reuse from the local cache) and initialize a checkpoint.
    /// Blocking; callers run this on a blocking thread.
    pub(crate) fn load(
        identifier: &str,
        repo_id: &str,
        preference: DevicePreference,
    ) -> Result<Self, ModelLoadError> {
        let device = select_device(preference)?;

        tracing::info!(
            model = identifier,
            repo = repo_id,
            device = ?device,
            "Loading Whisper model"
        );

        let api = Api::new().map_err(|e| ModelLoadError::DownloadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| ModelLoadError::DownloadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| ModelLoadError::DownloadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| ModelLoadError::DownloadFailed(format!("model.safetensors: {}", e)))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| ModelLoadError::InitializationFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| ModelLoadError::InitializationFailed(format!("parse config: {}", e)))?;

        let mel_filters = fetch_mel_filters(&api, &config)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| ModelLoadError::InitializationFailed(format!("tokenizer: {}", e)))?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], m::DTYPE, &device)
                .map_err(|e| ModelLoadError::InitializationFailed(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| ModelLoadError::InitializationFailed(format!("model init: {}", e)))?;

        tracing::info!(model = identifier, "Whisper model ready");

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device,
            mel_filters,
        })
    }

    fn mel_tensor(&self, samples: &[f32]) -> Result<Tensor, RecognitionError> {
        let mel = m::audio::pcm_to_mel(&self.config, samples, &self.mel_filters);
        let frames = mel.len() / self.config.num_mel_bins;
        let mel = Tensor::from_vec(mel, (1, self.config.num_mel_bins, frames), &self.device)
            .map_err(|e| RecognitionError::InvocationFailed(format!("mel tensor: {}", e)))?;
        // pcm_to_mel pads past the window, the encoder takes at most N_FRAMES
        mel.narrow(2, 0, usize::min(frames, m::N_FRAMES))
            .map_err(|e| RecognitionError::InvocationFailed(format!("mel window: {}", e)))
    }

    fn token_id(&self, token: &str) -> Result<u32, RecognitionError> {
        self.tokenizer.token_to_id(token).ok_or_else(|| {
            RecognitionError::InvocationFailed(format!("token {} not in vocabulary", token))
        })
    }

    fn language_token(&self, code: &str) -> Result<u32, RecognitionError> {
        self.tokenizer
            .token_to_id(&format!("<|{}|>", code))
            .ok_or_else(|| {
                RecognitionError::InvocationFailed(format!("unsupported language hint: {}", code))
            })
    }

    /// Pick the most probable language token from the first decoder step.
    /// Returns None for checkpoints without language tokens.
    fn detect_language(
        &self,
        model: &mut m::model::Whisper,
        audio_features: &Tensor,
    ) -> Result<Option<(String, u32)>, RecognitionError> {
        let sot_token = self.token_id(m::SOT_TOKEN)?;

        let tokens = Tensor::new(&[sot_token], &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| RecognitionError::InvocationFailed(format!("sot tensor: {}", e)))?;

        let output = model
            .decoder
            .forward(&tokens, audio_features, true)
            .map_err(|e| RecognitionError::InvocationFailed(format!("decoder: {}", e)))?;

        let logits = model
            .decoder
            .final_linear(&output)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.get(0))
            .map_err(|e| RecognitionError::InvocationFailed(format!("logits: {}", e)))?;

        let scores = logits
            .to_vec1::<f32>()
            .map_err(|e| RecognitionError::InvocationFailed(format!("logits read: {}", e)))?;

        model.reset_kv_cache();

        let mut best_code = "";
        let mut best_token = None;
        let mut best_score = f32::NEG_INFINITY;
        for &code in WHISPER_LANGUAGES {
            let Some(id) = self.tokenizer.token_to_id(&format!("<|{}|>", code)) else {
                continue;
            };
            let score = scores.get(id as usize).copied().unwrap_or(f32::NEG_INFINITY);
            if score > best_score {
                best_score = score;
                best_token = Some(id);
                best_code = code;
            }
        }

        Ok(best_token.map(|token| (best_code.to_string(), token)))
    }

    /// Greedy-decode one 30 second window into text.
    fn decode_segment(
        &self,
        model: &mut m::model::Whisper,
        audio_features: &Tensor,
        language_token: Option<u32>,
    ) -> Result<String, RecognitionError> {
        let sot_token = self.token_id(m::SOT_TOKEN)?;
        let transcribe_token = self.token_id(m::TRANSCRIBE_TOKEN)?;
        let no_timestamps_token = self.token_id(m::NO_TIMESTAMPS_TOKEN)?;
        let eot_token = self.token_id(m::EOT_TOKEN)?;

        let mut tokens = vec![sot_token];
        if let Some(language) = language_token {
            tokens.push(language);
        }
        tokens.push(transcribe_token);
        tokens.push(no_timestamps_token);

        let prompt_len = tokens.len();

        for _ in 0..MAX_SEGMENT_TOKENS {
            let token_tensor = Tensor::new(tokens.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| RecognitionError::InvocationFailed(format!("token tensor: {}", e)))?;

            let output = model
                .decoder
                .forward(&token_tensor, audio_features, tokens.len() == prompt_len)
                .map_err(|e| RecognitionError::InvocationFailed(format!("decoder: {}", e)))?;

            let logits = model
                .decoder
                .final_linear(&output)
                .and_then(|t| t.squeeze(0))
                .map_err(|e| RecognitionError::InvocationFailed(format!("logits: {}", e)))?;

            let seq_len = logits
                .dim(0)
                .map_err(|e| RecognitionError::InvocationFailed(format!("logits shape: {}", e)))?;

            let next_token = logits
                .get(seq_len - 1)
                .and_then(|t| t.argmax(0))
                .and_then(|t| t.to_scalar::<u32>())
                .map_err(|e| RecognitionError::InvocationFailed(format!("argmax: {}", e)))?;

            if next_token == eot_token {
                break;
            }

            tokens.push(next_token);
        }

        model.reset_kv_cache();

        let text = self
            .tokenizer
            .decode(&tokens[prompt_len..], true)
            .map_err(|e| RecognitionError::InvocationFailed(format!("token decode: {}", e)))?;

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl RecognitionModel for CandleWhisperModel {
    async fn transcribe(
        &self,
        audio: &[u8],
        language_hint: Option<&str>,
    ) -> Result<Transcript, RecognitionError> {
        let pcm = decode_to_mono_pcm(audio)?;

        let mut mel_windows = Vec::new();
        for chunk in pcm.chunks(m::N_SAMPLES) {
            let mut samples = chunk.to_vec();
            if samples.len() < m::N_SAMPLES {
                samples.resize(m::N_SAMPLES, 0.0);
            }
            mel_windows.push(self.mel_tensor(&samples)?);
        }

        let mut guard = self.model.lock().await;
        let model = &mut *guard;

        let mut language = language_hint.map(|code| code.to_string());
        let mut language_token = match language_hint {
            Some(code) => Some(self.language_token(code)?),
            None => None,
        };

        let mut segments = Vec::with_capacity(mel_windows.len());
        for (index, mel) in mel_windows.iter().enumerate() {
            tracing::debug!(segment = index, "Transcribing audio segment");

            let audio_features = model
                .encoder
                .forward(mel, true)
                .map_err(|e| RecognitionError::InvocationFailed(format!("encoder: {}", e)))?;

            if language_token.is_none() {
                if let Some((code, token)) = self.detect_language(model, &audio_features)? {
                    tracing::debug!(language = %code, "Detected spoken language");
                    language = Some(code);
                    language_token = Some(token);
                }
            }

            let segment = self.decode_segment(model, &audio_features, language_token)?;
            if !segment.is_empty() {
                segments.push(segment);
            }
        }

        let text = segments.join(" ");

        tracing::info!(
            segments = segments.len(),
            chars = text.len(),
            "Audio transcription completed"
        );

        Ok(Transcript::new(text, language))
    }
}

fn fetch_mel_filters(api: &Api, config: &Config) -> Result<Vec<f32>, ModelLoadError> {
    let filename = if config.num_mel_bins == 128 {
        "melfilters128.bytes"
    } else {
        "melfilters.bytes"
    };

    let repo = api.repo(Repo::new(MEL_FILTER_REPO.to_string(), RepoType::Model));
    let path = repo
        .get(filename)
        .map_err(|e| ModelLoadError::DownloadFailed(format!("{}: {}", filename, e)))?;
    let bytes = std::fs::read(&path)
        .map_err(|e| ModelLoadError::InitializationFailed(format!("read mel filters: {}", e)))?;

    parse_mel_filters(&bytes, config.num_mel_bins)
}

fn parse_mel_filters(bytes: &[u8], num_mel_bins: usize) -> Result<Vec<f32>, ModelLoadError> {
    let expected = num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected * 4 {
        return Err(ModelLoadError::InitializationFailed(format!(
            "mel filter file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected * 4
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .take(expected)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
