mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    GigaChatSettings, RecognitionSettings, ServerSettings, Settings, SettingsError,
    SynthesisSettings, UploadSettings,
};
