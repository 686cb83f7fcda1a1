use std::path::PathBuf;
use streamstats::app::AppStartupOptions;

fn main() -> anyhow::Result<()> {
    streamstats::logging::init();
    let options = parse_args(std::env::args().skip(1).collect())?;
    streamstats::app::run_with_startup(options)
}

fn parse_args(args: Vec<String>) -> anyhow::Result<AppStartupOptions> {
    let mut out = AppStartupOptions::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--file" => {
                let value = take_value(&args, &mut index, "--file", "path")?;
                out.history_path = Some(PathBuf::from(value));
            }
            "--top" => {
                let value = take_value(&args, &mut index, "--top", "count")?;
                let top_n: usize = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("--top expects a number, got {value}"))?;
                out.top_n = Some(top_n);
            }
            "--artists-by" => {
                let value = take_value(&args, &mut index, "--artists-by", "time|plays")?;
                out.artist_rank = Some(value.parse()?);
            }
            "--tracks-by" => {
                let value = take_value(&args, &mut index, "--tracks-by", "time|plays")?;
                out.track_rank = Some(value.parse()?);
            }
            "--artist" => {
                let value = take_value(&args, &mut index, "--artist", "name")?;
                out.selected_artist = Some(value.to_string());
            }
            "--list-artists" => out.list_artists = true,
            "--save" => out.save_settings = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn take_value<'a>(
    args: &'a [String],
    index: &mut usize,
    flag: &str,
    what: &str,
) -> anyhow::Result<&'a str> {
    *index += 1;
    let Some(value) = args.get(*index) else {
        anyhow::bail!("{flag} requires a {what} value");
    };
    if value.trim().is_empty() {
        anyhow::bail!("{flag} cannot be empty");
    }
    Ok(value.as_str())
}

fn print_help() {
    println!("streamstats");
    println!("  --file PATH          Streaming history export to read");
    println!("  --top N              Entries per chart (default 10)");
    println!("  --artists-by KEY     Rank artists by time or plays");
    println!("  --tracks-by KEY      Rank tracks by time or plays");
    println!("  --artist NAME        Show details for one artist");
    println!("  --list-artists       Print every artist name");
    println!("  --save               Persist the effective settings");
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamstats::rank::RankKey;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let options = parse_args(args(&[
            "--file",
            "history.json",
            "--top",
            "5",
            "--artists-by",
            "plays",
            "--tracks-by",
            "time",
            "--artist",
            "Neon",
            "--list-artists",
        ]))
        .expect("parse");

        assert_eq!(options.history_path, Some(PathBuf::from("history.json")));
        assert_eq!(options.top_n, Some(5));
        assert_eq!(options.artist_rank, Some(RankKey::Plays));
        assert_eq!(options.track_rank, Some(RankKey::Duration));
        assert_eq!(options.selected_artist.as_deref(), Some("Neon"));
        assert!(options.list_artists);
        assert!(!options.save_settings);
    }

    #[test]
    fn rejects_missing_values_and_unknown_flags() {
        assert!(parse_args(args(&["--top"])).is_err());
        assert!(parse_args(args(&["--top", "many"])).is_err());
        assert!(parse_args(args(&["--artists-by", "loudness"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }
}
