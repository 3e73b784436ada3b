mod health;
mod models;
mod speech;
mod transcribe;

pub use health::health_handler;
pub use models::models_handler;
pub use speech::{speech_audio_handler, synthesize_handler, voices_handler};
pub use transcribe::transcribe_handler;
