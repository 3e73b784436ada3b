pub mod audio_decoder;
mod whisper_loader;
mod whisper_model;

pub use whisper_loader::{
    cuda_available, whisper_model_info, CandleWhisperLoader, DevicePreference, WhisperModelInfo,
    WHISPER_MODELS,
};
pub use whisper_model::CandleWhisperModel;
