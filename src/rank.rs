use crate::stats::{ArtistStats, Totals};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankKey {
    #[default]
    Duration,
    Plays,
}

impl RankKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::Duration => "minutes streamed",
            Self::Plays => "streams",
        }
    }

    /// The other ranking, for callers that flip between the two views.
    pub fn toggle(self) -> Self {
        match self {
            Self::Duration => Self::Plays,
            Self::Plays => Self::Duration,
        }
    }

    fn value(self, totals: &Totals) -> u64 {
        match self {
            Self::Duration => totals.duration_ms,
            Self::Plays => totals.plays,
        }
    }
}

impl FromStr for RankKey {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "time" | "duration" | "minutes" => Ok(Self::Duration),
            "plays" | "streams" | "count" => Ok(Self::Plays),
            other => anyhow::bail!("unknown ranking {other}, expected time or plays"),
        }
    }
}

/// Anything that carries pre-aggregated totals can be ranked.
pub trait HasTotals {
    fn totals(&self) -> &Totals;
}

impl HasTotals for Totals {
    fn totals(&self) -> &Totals {
        self
    }
}

impl HasTotals for ArtistStats {
    fn totals(&self) -> &Totals {
        &self.totals
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Minutes(f64),
    Plays(u64),
}

impl Metric {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Minutes(minutes) => minutes,
            Self::Plays(plays) => plays as f64,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes(minutes) => write!(f, "{}", crate::format::format_minutes(*minutes)),
            Self::Plays(plays) => write!(f, "{} streams", crate::format::format_count(*plays)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<K> {
    pub key: K,
    pub metric: Metric,
}

/// Returns up to `n` entries of `index`, highest `key` first.
///
/// The sort is stable, so equal metrics keep the index's iteration order.
pub fn top_n<'a, K, V>(index: &'a IndexMap<K, V>, key: RankKey, n: usize) -> Vec<Ranked<&'a K>>
where
    V: HasTotals,
{
    let mut entries: Vec<(&K, &Totals)> = index
        .iter()
        .map(|(entity, stats)| (entity, stats.totals()))
        .collect();
    entries.sort_by(|a, b| compare_desc(a.1, b.1, key));
    entries.truncate(n);

    entries
        .into_iter()
        .map(|(entity, totals)| Ranked {
            key: entity,
            metric: metric_for(totals, key),
        })
        .collect()
}

fn compare_desc(a: &Totals, b: &Totals, key: RankKey) -> Ordering {
    key.value(b).cmp(&key.value(a))
}

fn metric_for(totals: &Totals, key: RankKey) -> Metric {
    match key {
        RankKey::Duration => Metric::Minutes(totals.duration_ms as f64 / MS_PER_MINUTE),
        RankKey::Plays => Metric::Plays(totals.plays),
    }
}
