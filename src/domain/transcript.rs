/// Output of one recognition pass over an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    /// ISO 639-1 code reported by the model, either echoed from the caller's
    /// hint or detected from the audio. `None` when the model could not tell.
    pub language: Option<String>,
}

impl Transcript {
    pub fn new(text: impl Into<String>, language: Option<String>) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }
}
