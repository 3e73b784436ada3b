mod credential;
mod model_key;
mod pipeline_task;
mod storage_path;
mod transcript;
mod voice;

pub use credential::Credential;
pub use model_key::{ModelKey, ModelKind};
pub use pipeline_task::PipelineTask;
pub use storage_path::{InvalidStoragePath, StoragePath};
pub use transcript::Transcript;
pub use voice::{Speaker, VoiceCatalog, VoiceProfile};
