use std::fmt;

/// Which family of inference model a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Recognition,
    Synthesis,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Recognition => "recognition",
            ModelKind::Synthesis => "synthesis",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of one loaded model instance. Recognition models are keyed by
/// identifier alone; synthesis models additionally carry the language they
/// serve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    kind: ModelKind,
    identifier: String,
    language: Option<String>,
}

impl ModelKey {
    pub fn recognition(identifier: impl Into<String>) -> Self {
        Self {
            kind: ModelKind::Recognition,
            identifier: identifier.into(),
            language: None,
        }
    }

    pub fn synthesis(identifier: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            kind: ModelKind::Synthesis,
            identifier: identifier.into(),
            language: Some(language.into()),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(lang) => write!(f, "{}/{}/{}", self.kind, self.identifier, lang),
            None => write!(f, "{}/{}", self.kind, self.identifier),
        }
    }
}
