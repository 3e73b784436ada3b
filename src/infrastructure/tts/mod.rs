mod silero_http;

pub use silero_http::{SileroHttpLoader, SileroHttpModel, SileroTtsConfig};
