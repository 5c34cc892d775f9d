use engine_logging::engine_info;

use crate::EngineEvent;

/// Observer for harvest and download progress.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Drops every event. Used in quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuietSink;

impl ProgressSink for QuietSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Writes every event to the log at info level. Failures are logged as
/// warnings by the engine itself, so quiet mode still reports them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::PageFetched {
                page,
                records,
                total,
            } => {
                engine_info!("Page {}: {} tracks ({} total)", page, records, total);
            }
            EngineEvent::HarvestFinished {
                pages_fetched,
                records,
                reason,
            } => {
                engine_info!(
                    "Harvest finished after {} pages with {} tracks: {}",
                    pages_fetched,
                    records,
                    reason
                );
            }
            EngineEvent::DownloadStarted { index, total, label } => {
                engine_info!("[{}/{}] Downloading {}", index, total, label);
            }
            EngineEvent::DownloadCompleted {
                index,
                total,
                outcome,
            } => match (&outcome.resolved_path, &outcome.error) {
                (Some(path), None) => {
                    engine_info!("[{}/{}] Saved {}", index, total, path.display());
                }
                (_, Some(err)) => {
                    engine_info!(
                        "[{}/{}] Failed {}: {}",
                        index,
                        total,
                        outcome.record.label(),
                        err
                    );
                }
                (None, None) => {}
            },
        }
    }
}
