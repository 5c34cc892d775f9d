use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use playlist_core::{
    dedupe_with_summary, default_output_path, HarvestRequest, OutputMode, Record,
    RecordSelection,
};
use playlist_engine::{
    harvest, load_records, persist_records, DownloadRequest, FailureKind, LogSink,
    MediaDownloader, PersistOutcome, PlaylistClient, ProgressSink, QuietSink, YtDlpRetriever,
};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::state;

/// Entry point used by `main`: loads config, picks the sink and drives the
/// async work on a fresh runtime.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let sink: Box<dyn ProgressSink> = if cli.quiet {
        Box::new(QuietSink)
    } else {
        Box::new(LogSink)
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(execute(cli, &config, sink.as_ref()))
}

pub async fn execute(cli: &Cli, config: &AppConfig, sink: &dyn ProgressSink) -> anyhow::Result<()> {
    match &cli.from_file {
        Some(path) => download_from_file(cli, config, path, sink).await,
        None => harvest_and_save(cli, config, sink).await,
    }
}

async fn harvest_and_save(
    cli: &Cli,
    config: &AppConfig,
    sink: &dyn ProgressSink,
) -> anyhow::Result<()> {
    let harvest_settings = config.harvest_settings();
    let client =
        PlaylistClient::new(config.fetch_settings()).context("failed to build HTTP client")?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.channel));
    let output_dir = output_dir_of(&output);
    let start_cursor = start_cursor(cli, &output_dir);

    engine_info!(
        "Harvesting {} (up to {} pages{})",
        cli.channel,
        cli.pages,
        cli.max_records()
            .map(|n| format!(", {n} songs"))
            .unwrap_or_default()
    );

    match client.warm_up(&cli.channel).await {
        Ok(()) => {}
        Err(err) if err.kind == FailureKind::HttpStatus(404) => {
            bail!("channel '{}' not found", cli.channel);
        }
        Err(err) => engine_warn!("Warm-up request failed, continuing: {}", err),
    }
    if !harvest_settings.warmup_delay.is_zero() {
        tokio::time::sleep(harvest_settings.warmup_delay).await;
    }

    let request = HarvestRequest::new(cli.channel.clone(), cli.pages)
        .with_max_records(cli.max_records())
        .with_start_cursor(start_cursor);
    let outcome = harvest(&client, &request, &harvest_settings, sink).await;

    if outcome.records.is_empty() {
        engine_warn!("No songs found for {} ({})", cli.channel, outcome.stop_reason);
        return Ok(());
    }
    state::save_cursor(
        &output_dir,
        &cli.channel,
        &outcome.last_cursor,
        outcome.pages_fetched,
    );

    let (unique, summary) = dedupe_with_summary(&outcome.records);
    engine_info!(
        "Collected {} songs from {} pages: {} unique, {} duplicates, {} without video id",
        outcome.records.len(),
        outcome.pages_fetched,
        summary.kept,
        summary.duplicates,
        summary.missing_id
    );

    let mode = OutputMode::from_flags(cli.unique_only, cli.save_both);
    for target in mode.targets(&output) {
        let records = select(target.selection, &outcome.records, &unique);
        match persist_records(records, &target.path) {
            Ok(PersistOutcome::Written { path, count }) => {
                engine_info!("Saved {} songs to {}", count, path.display());
            }
            Ok(PersistOutcome::NothingToWrite) => {}
            Err(err) => engine_error!("Could not save {}: {}", target.path.display(), err),
        }
    }

    if cli.download {
        let records = select(mode.download_selection(), &outcome.records, &unique);
        download_records(cli, config, records, Some(cli.channel.clone()), sink).await?;
    }
    Ok(())
}

async fn download_from_file(
    cli: &Cli,
    config: &AppConfig,
    path: &Path,
    sink: &dyn ProgressSink,
) -> anyhow::Result<()> {
    let records =
        load_records(path).with_context(|| format!("failed to load {}", path.display()))?;
    if records.is_empty() {
        engine_warn!("{} contains no songs", path.display());
        return Ok(());
    }

    let mode = OutputMode::from_flags(cli.unique_only, cli.save_both);
    let (unique, _) = dedupe_with_summary(&records);
    let selected = select(mode.download_selection(), &records, &unique);
    engine_info!("Loaded {} songs from {}", selected.len(), path.display());
    download_records(cli, config, selected, None, sink).await
}

async fn download_records(
    cli: &Cli,
    config: &AppConfig,
    records: &[Record],
    album: Option<String>,
    sink: &dyn ProgressSink,
) -> anyhow::Result<()> {
    let retriever = match &config.yt_dlp_path {
        Some(path) => YtDlpRetriever::new(path.clone()),
        None => YtDlpRetriever::from_path().ok_or_else(|| {
            anyhow!("yt-dlp not found on PATH; install it or set yt_dlp_path in the config")
        })?,
    };
    engine_debug!("Using yt-dlp at {}", retriever.binary_path().display());

    let mut request = DownloadRequest::new(&cli.download_dir);
    request.format = cli.format;
    request.quality = cli.quality;
    request.embed_metadata = !cli.no_metadata;
    request.album = album;

    let downloader = MediaDownloader::new(Box::new(retriever));
    let (_, summary) = downloader.download_batch(records, &request, sink).await;

    engine_info!(
        "Downloads finished: {} of {} succeeded into {}",
        summary.succeeded,
        summary.attempted,
        cli.download_dir.display()
    );
    if summary.failed > 0 {
        engine_warn!("{} downloads failed", summary.failed);
    }
    if summary.tag_warnings > 0 {
        engine_warn!("{} files were saved without tags", summary.tag_warnings);
    }
    Ok(())
}

fn select<'a>(selection: RecordSelection, all: &'a [Record], unique: &'a [Record]) -> &'a [Record] {
    match selection {
        RecordSelection::All => all,
        RecordSelection::Unique => unique,
    }
}

/// Directory holding the CSV output; the resume state lives there too.
fn output_dir_of(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// `--start-id` wins over `--resume`; without either the harvest starts at
/// the newest entry.
fn start_cursor(cli: &Cli, output_dir: &Path) -> String {
    if let Some(id) = &cli.start_id {
        if cli.resume {
            engine_info!("--start-id given, ignoring saved cursor");
        }
        return id.clone();
    }
    if cli.resume {
        match state::load_cursor(output_dir, &cli.channel) {
            Some(saved) => return saved.last_cursor,
            None => engine_warn!("No saved cursor for {}, starting from the top", cli.channel),
        }
    }
    String::new()
}
