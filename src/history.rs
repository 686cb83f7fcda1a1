use crate::error::{LoadError, Result};
use crate::model::ListenRecord;
use crate::stats::{self, ListeningStats};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where the raw history bytes come from.
pub trait LogSource {
    fn fetch(&self) -> Result<Vec<u8>>;
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogSource for FileSource {
    fn fetch(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|source| LoadError::Fetch {
            source_name: self.describe(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl LogSource for MemorySource {
    fn fetch(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn describe(&self) -> String {
        String::from("<memory>")
    }
}

/// Parses an exported history. Only the top-level shape is enforced here.
pub fn parse_log(bytes: &[u8]) -> Result<Vec<ListenRecord>> {
    let value: Value = serde_json::from_slice(bytes)?;
    match value {
        Value::Array(items) => Ok(items.into_iter().map(ListenRecord::from_value).collect()),
        other => Err(LoadError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

/// Fetches, parses and aggregates in one go. Nothing is returned unless every step succeeds.
pub fn load_stats(source: &dyn LogSource) -> Result<ListeningStats> {
    let bytes = source.fetch()?;
    let records = parse_log(&bytes)?;
    let stats = stats::aggregate(&records);

    let summary = stats.summary();
    let skipped = (records.len() as u64).saturating_sub(summary.plays);
    if skipped > 0 {
        debug!(skipped, "skipped invalid listening records");
    }
    info!(
        source = %source.describe(),
        records = records.len(),
        artists = summary.artists,
        tracks = summary.tracks,
        "loaded listening history"
    );
    Ok(stats)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
