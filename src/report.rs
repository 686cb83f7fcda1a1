use crate::format::{format_count, format_duration};
use crate::rank::{Metric, RankKey, Ranked};
use crate::stats::{ArtistStats, ListeningStats};
use std::fmt::Write;

const BAR_WIDTH: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub top_n: usize,
    pub artist_rank: RankKey,
    pub track_rank: RankKey,
    pub selected_artist: Option<String>,
    pub list_artists: bool,
}

pub fn render(stats: &ListeningStats, view: &ReportView) -> String {
    let mut out = String::new();
    render_summary(&mut out, stats);

    let artists = stats.top_artists(view.artist_rank, view.top_n);
    render_chart(
        &mut out,
        &format!("Top artists by {}", view.artist_rank.label()),
        view.top_n,
        artists.iter().map(|entry| (entry.key.clone(), entry.metric)),
    );

    let tracks = stats.top_tracks(view.track_rank, view.top_n);
    render_chart(
        &mut out,
        &format!("Top tracks by {}", view.track_rank.label()),
        view.top_n,
        tracks
            .iter()
            .map(|entry| (format!("{} ({})", entry.key.track, entry.key.artist), entry.metric)),
    );

    if let Some(name) = view.selected_artist.as_deref()
        && let Some(artist) = stats.artist(name)
    {
        render_artist(&mut out, name, artist, view.top_n);
    }

    if view.list_artists {
        let _ = writeln!(out, "\nArtists");
        for name in stats.artist_names() {
            let _ = writeln!(out, "  {name}");
        }
    }
    out
}

fn render_summary(out: &mut String, stats: &ListeningStats) {
    let summary = stats.summary();
    let _ = writeln!(out, "Total streams   {}", format_count(summary.plays));
    let _ = writeln!(out, "Total time      {}", format_duration(summary.duration_ms));
    let _ = writeln!(out, "Unique artists  {}", format_count(summary.artists as u64));
    let _ = writeln!(out, "Unique tracks   {}", format_count(summary.tracks as u64));
}

fn render_artist(out: &mut String, name: &str, artist: &ArtistStats, top_n: usize) {
    let _ = writeln!(out, "\n{name}");
    let _ = writeln!(out, "  Total time     {}", format_duration(artist.duration_ms()));
    let _ = writeln!(out, "  Total streams  {}", format_count(artist.plays()));
    let _ = writeln!(out, "  Unique tracks  {}", artist.distinct_track_count());

    let tracks: Vec<Ranked<&String>> = artist.top_tracks(RankKey::Duration, top_n);
    render_chart(
        out,
        "  Top tracks by minutes streamed",
        top_n,
        tracks.iter().map(|entry| (entry.key.clone(), entry.metric)),
    );
}

// A limit of zero asks for no chart at all, not an empty one.
fn render_chart(
    out: &mut String,
    title: &str,
    limit: usize,
    rows: impl Iterator<Item = (String, Metric)>,
) {
    if limit == 0 {
        return;
    }
    let rows: Vec<(String, Metric)> = rows.collect();
    let _ = writeln!(out, "\n{title}");
    if rows.is_empty() {
        let _ = writeln!(out, "  (no listens)");
        return;
    }

    let leader = rows
        .iter()
        .map(|(_, metric)| metric.as_f64())
        .fold(0.0_f64, f64::max);
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    for (rank, (label, metric)) in rows.iter().enumerate() {
        let ratio = (leader > 0.0).then(|| metric.as_f64() / leader);
        let padding = label_width.saturating_sub(label.chars().count());
        let _ = writeln!(
            out,
            "  {:>2}. {label}{} {} {metric}",
            rank + 1,
            " ".repeat(padding),
            bar(ratio, BAR_WIDTH),
        );
    }
}

fn bar(ratio: Option<f64>, width: usize) -> String {
    let clamped = ratio.unwrap_or(0.0).clamp(0.0, 1.0);
    let filled = (clamped * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.push_str(&"#".repeat(filled));
    bar.push_str(&"-".repeat(width.saturating_sub(filled)));
    bar.push(']');
    bar
}
