#![no_main]

use libfuzzer_sys::fuzz_target;
use streamstats::history::parse_log;
use streamstats::rank::RankKey;
use streamstats::stats::aggregate;

fuzz_target!(|data: &[u8]| {
    let Ok(records) = parse_log(data) else {
        return;
    };
    let stats = aggregate(&records);
    let valid = records.iter().filter(|record| record.validate().is_some()).count();
    assert_eq!(stats.summary().plays, valid as u64);

    for artist in stats.artists().values() {
        let nested: u64 = artist.tracks().values().map(|totals| totals.plays).sum();
        assert_eq!(nested, artist.plays());
    }
    for key in [RankKey::Duration, RankKey::Plays] {
        assert!(stats.top_artists(key, 10).len() <= 10);
        assert!(stats.top_tracks(key, 3).len() <= 3);
    }
});
