use std::fmt;

/// A validated object name inside one of the media stores. Names are single
/// path segments; anything that could climb out of the store root is
/// rejected at construction, so handlers can pass client-supplied filenames
/// through without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidStoragePath {
    #[error("storage name is empty")]
    Empty,
    #[error("storage name contains a path separator: {0}")]
    PathSeparator(String),
    #[error("storage name contains a parent reference: {0}")]
    ParentReference(String),
}

impl StoragePath {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidStoragePath> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidStoragePath::Empty);
        }
        if name.contains('/') || name.contains('\\') {
            return Err(InvalidStoragePath::PathSeparator(name));
        }
        if name.contains("..") {
            return Err(InvalidStoragePath::ParentReference(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
