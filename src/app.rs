use crate::config::{self, Settings};
use crate::history::{self, FileSource};
use crate::rank::RankKey;
use crate::report::{self, ReportView};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Command-line overrides layered on top of the saved settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppStartupOptions {
    pub history_path: Option<PathBuf>,
    pub top_n: Option<usize>,
    pub artist_rank: Option<RankKey>,
    pub track_rank: Option<RankKey>,
    pub selected_artist: Option<String>,
    pub list_artists: bool,
    pub save_settings: bool,
}

impl AppStartupOptions {
    pub fn apply(&self, settings: &Settings) -> Settings {
        Settings {
            history_path: self
                .history_path
                .clone()
                .unwrap_or_else(|| settings.history_path.clone()),
            top_n: self.top_n.unwrap_or(settings.top_n),
            artist_rank: self.artist_rank.unwrap_or(settings.artist_rank),
            track_rank: self.track_rank.unwrap_or(settings.track_rank),
        }
    }

    fn view(&self, settings: &Settings) -> ReportView {
        ReportView {
            top_n: settings.top_n,
            artist_rank: settings.artist_rank,
            track_rank: settings.track_rank,
            selected_artist: self.selected_artist.clone(),
            list_artists: self.list_artists,
        }
    }
}

pub fn run_with_startup(options: AppStartupOptions) -> Result<()> {
    let settings = options.apply(&config::load_settings()?);
    if options.save_settings {
        config::save_settings(&settings)?;
    }

    let mut out = io::stdout().lock();
    run_report(&options, &settings, &mut out)
}

fn run_report(options: &AppStartupOptions, settings: &Settings, out: &mut impl Write) -> Result<()> {
    let source = FileSource::new(&settings.history_path);
    let stats = match history::load_stats(&source) {
        Ok(stats) => stats,
        Err(err) => {
            debug!(error = %err, "failed to load listening history");
            return Err(err).context("Failed to load streaming data");
        }
    };

    let text = report::render(&stats, &options.view(settings));
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}
