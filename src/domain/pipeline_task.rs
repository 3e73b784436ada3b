use std::fmt;
use std::str::FromStr;

/// What the pipeline should do with a transcript after recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineTask {
    Transcribe,
    Correct,
    Summarize,
    Translate,
}

impl PipelineTask {
    pub const ALL: [PipelineTask; 4] = [
        PipelineTask::Transcribe,
        PipelineTask::Correct,
        PipelineTask::Summarize,
        PipelineTask::Translate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineTask::Transcribe => "transcribe",
            PipelineTask::Correct => "correct",
            PipelineTask::Summarize => "summarize",
            PipelineTask::Translate => "translate",
        }
    }

    /// Tasks other than plain transcription require the remote rewrite stage.
    pub fn needs_text_processing(&self) -> bool {
        !matches!(self, PipelineTask::Transcribe)
    }
}

impl FromStr for PipelineTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transcribe" => Ok(PipelineTask::Transcribe),
            "correct" => Ok(PipelineTask::Correct),
            "summarize" => Ok(PipelineTask::Summarize),
            "translate" => Ok(PipelineTask::Translate),
            _ => Err(format!("Invalid task: {}", s)),
        }
    }
}

impl fmt::Display for PipelineTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
