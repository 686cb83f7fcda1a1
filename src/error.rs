use std::io;
use thiserror::Error;

/// Failures that stop a listening history from being loaded at all.
///
/// Malformed individual records are not errors; they are skipped during aggregation.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read listening history from {source_name}")]
    Fetch {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("listening history is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("listening history must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },
}

impl LoadError {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    pub fn is_parse(&self) -> bool {
        !self.is_fetch()
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
