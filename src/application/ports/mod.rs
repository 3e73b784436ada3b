mod chat_client;
mod media_store;
mod model_loader;
mod recognition_model;
mod synthesis_model;
mod token_provider;

pub use chat_client::{ChatClientError, ChatCompletionClient};
pub use media_store::{MediaStore, MediaStoreError};
pub use model_loader::{ModelLoadError, RecognitionModelLoader, SynthesisModelLoader};
pub use recognition_model::{RecognitionError, RecognitionModel};
pub use synthesis_model::{SynthesisError, SynthesisModel};
pub use token_provider::{AuthError, TokenProvider};
