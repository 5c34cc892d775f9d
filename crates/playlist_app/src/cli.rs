use std::path::PathBuf;

use clap::Parser;
use playlist_engine::{AudioQuality, MediaFormat};

/// Harvest a radio station's playlist into CSV and optionally download the songs.
#[derive(Debug, Clone, Parser)]
#[command(name = "playlist-harvester", version, about)]
pub struct Cli {
    /// Channel slug on the playlist site.
    #[arg(short, long, default_value = "swr4")]
    pub channel: String,

    /// Maximum number of playlist pages to fetch.
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Stop after this many songs.
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_songs: Option<u64>,

    /// CSV destination (default: `{channel}_playlist.csv`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pagination cursor to start from.
    #[arg(long)]
    pub start_id: Option<String>,

    /// Continue from the cursor saved by the previous run for this channel.
    #[arg(long)]
    pub resume: bool,

    /// Save only deduplicated songs.
    #[arg(long, conflicts_with = "save_both")]
    pub unique_only: bool,

    /// Save both `{stem}_all.csv` and `{stem}_unique.csv`.
    #[arg(long)]
    pub save_both: bool,

    /// Download the harvested songs with yt-dlp.
    #[arg(short, long)]
    pub download: bool,

    /// Media format for downloads.
    #[arg(long, default_value = "mp3")]
    pub format: MediaFormat,

    /// Audio quality: `best` or a bitrate such as 192 or 320k.
    #[arg(long, default_value = "best")]
    pub quality: AudioQuality,

    /// Directory for downloaded media.
    #[arg(long, default_value = "downloads")]
    pub download_dir: PathBuf,

    /// Do not write artist/title tags into downloaded files.
    #[arg(long)]
    pub no_metadata: bool,

    /// Skip harvesting and download every song listed in this CSV.
    #[arg(long, value_name = "CSV")]
    pub from_file: Option<PathBuf>,

    /// Only print warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print debug output.
    #[arg(short, long)]
    pub verbose: bool,

    /// RON file overriding network and tool settings.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write the log to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn max_records(&self) -> Option<usize> {
        self.max_songs.map(|n| usize::try_from(n).unwrap_or(usize::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = Cli::try_parse_from(["playlist-harvester"]).unwrap();
        assert_eq!(cli.channel, "swr4");
        assert_eq!(cli.pages, 3);
        assert_eq!(cli.max_records(), None);
        assert_eq!(cli.format, MediaFormat::Mp3);
        assert_eq!(cli.quality, AudioQuality::Best);
        assert_eq!(cli.download_dir, PathBuf::from("downloads"));
        assert!(!cli.download && !cli.resume && !cli.quiet);
    }

    #[test]
    fn unique_only_and_save_both_conflict() {
        let result =
            Cli::try_parse_from(["playlist-harvester", "--unique-only", "--save-both"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_pages_and_zero_songs_are_rejected() {
        assert!(Cli::try_parse_from(["playlist-harvester", "-p", "0"]).is_err());
        assert!(Cli::try_parse_from(["playlist-harvester", "-n", "0"]).is_err());
    }

    #[test]
    fn format_and_quality_parse() {
        let cli = Cli::try_parse_from([
            "playlist-harvester",
            "--format",
            "opus",
            "--quality",
            "320k",
            "-n",
            "25",
        ])
        .unwrap();
        assert_eq!(cli.format, MediaFormat::Opus);
        assert_eq!(cli.quality, AudioQuality::Kbps(320));
        assert_eq!(cli.max_records(), Some(25));
        assert!(Cli::try_parse_from(["playlist-harvester", "--format", "aiff"]).is_err());
    }
}
