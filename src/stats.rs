use crate::model::{Listen, ListenRecord};
use crate::rank::{self, RankKey, Ranked};
use indexmap::IndexMap;
use std::fmt;

/// Pre-summed listening time and play count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub duration_ms: u64,
    pub plays: u64,
}

impl Totals {
    fn add_listen(&mut self, played_ms: u64) {
        self.duration_ms = self.duration_ms.saturating_add(played_ms);
        self.plays = self.plays.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtistStats {
    pub totals: Totals,
    tracks: IndexMap<String, Totals>,
}

impl ArtistStats {
    pub fn duration_ms(&self) -> u64 {
        self.totals.duration_ms
    }

    pub fn plays(&self) -> u64 {
        self.totals.plays
    }

    pub fn distinct_track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Per-track totals for this artist, in first-listen order.
    pub fn tracks(&self) -> &IndexMap<String, Totals> {
        &self.tracks
    }

    pub fn track(&self, title: &str) -> Option<&Totals> {
        self.tracks.get(title)
    }

    pub fn top_tracks(&self, key: RankKey, n: usize) -> Vec<Ranked<&String>> {
        rank::top_n(&self.tracks, key, n)
    }
}

/// Identity of a track across the whole log. Titles alone are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey {
    pub artist: String,
    pub track: String,
}

impl TrackKey {
    pub fn new(artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            track: track.into(),
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.track, self.artist)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub plays: u64,
    pub duration_ms: u64,
    pub artists: usize,
    pub tracks: usize,
}

/// Artist and track indexes built from one pass over a listening log.
///
/// Both indexes keep first-encounter order, which is what ranking ties fall
/// back on. Nothing outside [`aggregate`] can mutate them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListeningStats {
    artists: IndexMap<String, ArtistStats>,
    tracks: IndexMap<TrackKey, Totals>,
}

pub fn aggregate<'a, I>(records: I) -> ListeningStats
where
    I: IntoIterator<Item = &'a ListenRecord>,
{
    let mut stats = ListeningStats::default();
    for listen in records.into_iter().filter_map(ListenRecord::validate) {
        stats.fold(listen);
    }
    stats
}

impl ListeningStats {
    fn fold(&mut self, listen: Listen<'_>) {
        let artist = self.artists.entry(listen.artist.to_owned()).or_default();
        artist.totals.add_listen(listen.played_ms);
        artist
            .tracks
            .entry(listen.track.to_owned())
            .or_default()
            .add_listen(listen.played_ms);

        self.tracks
            .entry(TrackKey::new(listen.artist, listen.track))
            .or_default()
            .add_listen(listen.played_ms);
    }

    pub fn artists(&self) -> &IndexMap<String, ArtistStats> {
        &self.artists
    }

    pub fn tracks(&self) -> &IndexMap<TrackKey, Totals> {
        &self.tracks
    }

    /// Exact, case-sensitive lookup. `None` means there is nothing to show.
    pub fn artist(&self, name: &str) -> Option<&ArtistStats> {
        if name.is_empty() {
            return None;
        }
        self.artists.get(name)
    }

    pub fn track(&self, artist: &str, track: &str) -> Option<&Totals> {
        self.tracks.get(&TrackKey::new(artist, track))
    }

    /// Sorted by Unicode scalar value, so names above U+FFFF sort after U+E000..U+FFFF.
    pub fn artist_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.artists.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn top_artists(&self, key: RankKey, n: usize) -> Vec<Ranked<&String>> {
        rank::top_n(&self.artists, key, n)
    }

    pub fn top_tracks(&self, key: RankKey, n: usize) -> Vec<Ranked<&TrackKey>> {
        rank::top_n(&self.tracks, key, n)
    }

    pub fn summary(&self) -> Summary {
        let (plays, duration_ms) = self.artists.values().fold((0_u64, 0_u64), |acc, artist| {
            (
                acc.0.saturating_add(artist.plays()),
                acc.1.saturating_add(artist.duration_ms()),
            )
        });
        Summary {
            plays,
            duration_ms,
            artists: self.artists.len(),
            tracks: self.tracks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prop_assert_eq;
    use std::collections::{HashMap, HashSet};

    fn sample_log() -> Vec<ListenRecord> {
        vec![
            ListenRecord::new("A", "X", 1_000),
            ListenRecord::new("A", "X", 2_000),
            ListenRecord::new("A", "Y", 500),
            ListenRecord::new("B", "Z", -5),
        ]
    }

    #[test]
    fn folds_valid_listens_and_drops_invalid_ones() {
        let stats = aggregate(&sample_log());

        let artist = stats.artist("A").expect("artist A");
        assert_eq!(artist.plays(), 3);
        assert_eq!(artist.duration_ms(), 3_500);
        assert_eq!(artist.distinct_track_count(), 2);
        assert!(stats.artist("B").is_none());
        assert_eq!(stats.track("A", "X").map(|totals| totals.plays), Some(2));
        assert_eq!(stats.tracks().len(), 2);
    }

    #[test]
    fn record_without_track_is_excluded() {
        let mut missing_track = ListenRecord::new("A", "X", 1_000);
        missing_track.track_name = None;
        let stats = aggregate(&[missing_track, ListenRecord::new("B", "Y", 10)]);

        assert!(stats.artist("A").is_none());
        assert_eq!(stats.summary().plays, 1);
    }

    #[test]
    fn same_title_under_different_artists_stays_separate() {
        let stats = aggregate(&[
            ListenRecord::new("A", "Intro", 100),
            ListenRecord::new("B", "Intro", 200),
        ]);

        assert_eq!(stats.tracks().len(), 2);
        assert_eq!(stats.track("A", "Intro").map(|t| t.duration_ms), Some(100));
        assert_eq!(stats.track("B", "Intro").map(|t| t.duration_ms), Some(200));
    }

    #[test]
    fn titles_containing_the_label_separator_do_not_collide() {
        let stats = aggregate(&[
            ListenRecord::new("C", "A - B", 100),
            ListenRecord::new("B - C", "A", 100),
        ]);

        assert_eq!(stats.tracks().len(), 2);
        let labels: Vec<String> = stats.tracks().keys().map(ToString::to_string).collect();
        assert_eq!(labels, ["A - B - C", "A - B - C"]);
    }

    #[test]
    fn names_are_not_normalized() {
        let stats = aggregate(&[
            ListenRecord::new("Neon", "X", 100),
            ListenRecord::new("neon", "X", 100),
            ListenRecord::new("Neon ", "X", 100),
        ]);

        assert_eq!(stats.artists().len(), 3);
        assert!(stats.artist("NEON").is_none());
    }

    #[test]
    fn empty_artist_lookup_is_a_miss() {
        let stats = aggregate(&sample_log());
        assert!(stats.artist("").is_none());
    }

    #[test]
    fn artist_names_are_sorted() {
        let stats = aggregate(&[
            ListenRecord::new("beta", "X", 1),
            ListenRecord::new("Alpha", "X", 1),
            ListenRecord::new("Gamma", "X", 1),
        ]);
        assert_eq!(stats.artist_names(), ["Alpha", "Gamma", "beta"]);
    }

    #[test]
    fn artist_names_sort_by_scalar_value_beyond_the_bmp() {
        let stats = aggregate(&[
            ListenRecord::new("\u{1F3B5} Notes", "X", 1),
            ListenRecord::new("\u{FF5E} Wave", "X", 1),
        ]);
        assert_eq!(stats.artist_names(), ["\u{FF5E} Wave", "\u{1F3B5} Notes"]);
    }

    #[test]
    fn summary_counts_only_valid_listens() {
        let summary = aggregate(&sample_log()).summary();
        assert_eq!(
            summary,
            Summary {
                plays: 3,
                duration_ms: 3_500,
                artists: 1,
                tracks: 2,
            }
        );
    }

    #[test]
    fn indexes_keep_first_encounter_order() {
        let stats = aggregate(&[
            ListenRecord::new("Zed", "b", 1),
            ListenRecord::new("Amy", "a", 1),
            ListenRecord::new("Zed", "a", 1),
        ]);

        let artists: Vec<&String> = stats.artists().keys().collect();
        assert_eq!(artists, ["Zed", "Amy"]);
        let zed_tracks: Vec<&String> = stats.artist("Zed").expect("Zed").tracks().keys().collect();
        assert_eq!(zed_tracks, ["b", "a"]);
    }

    fn arb_record() -> impl proptest::strategy::Strategy<Value = ListenRecord> {
        use proptest::prelude::*;
        (
            prop::sample::select(vec!["", "A", "B", "C"]),
            prop::sample::select(vec!["", "x", "y", "z"]),
            -1_000_i64..10_000,
        )
            .prop_map(|(artist, track, ms)| ListenRecord::new(artist, track, ms))
    }

    proptest::proptest! {
        #[test]
        fn rollups_match_valid_listens(records in proptest::collection::vec(arb_record(), 0..200)) {
            let stats = aggregate(&records);
            let valid: Vec<Listen<'_>> = records.iter().filter_map(ListenRecord::validate).collect();

            let total_plays: u64 = stats.artists().values().map(ArtistStats::plays).sum();
            prop_assert_eq!(total_plays, valid.len() as u64);

            let mut titles: HashMap<&str, HashSet<&str>> = HashMap::new();
            for listen in &valid {
                titles.entry(listen.artist).or_default().insert(listen.track);
            }
            for (name, artist) in stats.artists() {
                let nested: u64 = artist.tracks().values().map(|t| t.plays).sum();
                let nested_ms: u64 = artist.tracks().values().map(|t| t.duration_ms).sum();
                prop_assert_eq!(nested, artist.plays());
                prop_assert_eq!(nested_ms, artist.duration_ms());
                prop_assert_eq!(artist.distinct_track_count(), titles[name.as_str()].len());
            }

            let global_plays: u64 = stats.tracks().values().map(|t| t.plays).sum();
            prop_assert_eq!(global_plays, valid.len() as u64);
        }

        #[test]
        fn aggregation_is_idempotent(records in proptest::collection::vec(arb_record(), 0..100)) {
            prop_assert_eq!(aggregate(&records), aggregate(&records));
        }
    }
}
