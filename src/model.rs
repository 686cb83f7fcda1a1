use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a streaming history export, exactly as it appears on disk.
///
/// Every field is kept as a raw JSON value so that a single malformed entry
/// never fails the whole log; validation happens in [`ListenRecord::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListenRecord {
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
    #[serde(rename = "artistName", default, skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<Value>,
    #[serde(rename = "trackName", default, skip_serializing_if = "Option::is_none")]
    pub track_name: Option<Value>,
    #[serde(rename = "msPlayed", default, skip_serializing_if = "Option::is_none")]
    pub ms_played: Option<Value>,
}

/// A validated listen borrowed from a [`ListenRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listen<'a> {
    pub artist: &'a str,
    pub track: &'a str,
    pub played_ms: u64,
    pub end_time: Option<&'a str>,
}

impl ListenRecord {
    pub fn new(artist: &str, track: &str, ms_played: i64) -> Self {
        Self {
            end_time: None,
            artist_name: Some(Value::from(artist)),
            track_name: Some(Value::from(track)),
            ms_played: Some(Value::from(ms_played)),
        }
    }

    /// Lenient conversion for array elements that may not be objects at all.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Returns the listen if the record has a non-empty artist, a non-empty
    /// track and a positive play duration.
    pub fn validate(&self) -> Option<Listen<'_>> {
        let artist = non_empty_str(self.artist_name.as_ref())?;
        let track = non_empty_str(self.track_name.as_ref())?;
        let played_ms = positive_millis(self.ms_played.as_ref())?;
        Some(Listen {
            artist,
            track,
            played_ms,
            end_time: self.end_time.as_ref().and_then(Value::as_str),
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

// Fractional milliseconds are floored; anything not strictly positive is rejected.
fn positive_millis(value: Option<&Value>) -> Option<u64> {
    let value = value?;
    if let Some(ms) = value.as_u64() {
        return (ms > 0).then_some(ms);
    }
    let ms = value.as_f64()?;
    if ms.is_finite() && ms > 0.0 {
        Some(ms.floor() as u64)
    } else {
        None
    }
}
