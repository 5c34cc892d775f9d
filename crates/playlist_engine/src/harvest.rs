use std::collections::VecDeque;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};
use playlist_core::{
    update, HarvestEffect, HarvestMsg, HarvestOutcome, HarvestRequest, HarvestState, StopReason,
};

use crate::fetch::PageSource;
use crate::report::ProgressSink;
use crate::EngineEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSettings {
    /// Politeness delay between page requests.
    pub page_delay: Duration,
    /// Pause after the session warm-up request.
    pub warmup_delay: Duration,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_secs(1),
            warmup_delay: Duration::from_secs(2),
        }
    }
}

/// Runs one harvest: fetches pages one at a time until the state machine stops.
///
/// Early termination is never an error; the reason is in the outcome.
pub async fn harvest(
    source: &dyn PageSource,
    request: &HarvestRequest,
    settings: &HarvestSettings,
    sink: &dyn ProgressSink,
) -> HarvestOutcome {
    let (mut state, effects) = update(HarvestState::new(request), HarvestMsg::Start);
    let mut pending: VecDeque<HarvestEffect> = effects.into();

    while let Some(effect) = pending.pop_front() {
        match effect {
            HarvestEffect::Throttle => {
                if !settings.page_delay.is_zero() {
                    tokio::time::sleep(settings.page_delay).await;
                }
            }
            HarvestEffect::FetchPage { page, cursor } => {
                let msg = match source.fetch_page(&request.channel, page, &cursor).await {
                    Ok(extraction) => {
                        engine_debug!(
                            "Page {}: {} items, {} records",
                            page,
                            extraction.item_count,
                            extraction.records.len()
                        );
                        if !extraction.records.is_empty() {
                            sink.emit(EngineEvent::PageFetched {
                                page,
                                records: extraction.records.len(),
                                total: state.records().len() + extraction.records.len(),
                            });
                        }
                        HarvestMsg::PageLoaded {
                            page,
                            records: extraction.records,
                            item_count: extraction.item_count,
                        }
                    }
                    Err(err) => {
                        engine_warn!("Error fetching page {}: {}", page, err);
                        HarvestMsg::PageFailed {
                            page,
                            message: err.to_string(),
                        }
                    }
                };
                let (next, effects) = update(state, msg);
                state = next;
                pending.extend(effects);
            }
            HarvestEffect::Stop(reason) => return finish(state, reason, sink),
        }
    }

    // The state machine always ends with a stop effect.
    finish(state, StopReason::PageLimit, sink)
}

fn finish(state: HarvestState, reason: StopReason, sink: &dyn ProgressSink) -> HarvestOutcome {
    if let StopReason::UnrecognizedItems { .. } = reason {
        engine_warn!("{}; the playlist markup may have changed", reason);
    }
    let outcome = state.finish(reason);
    sink.emit(EngineEvent::HarvestFinished {
        pages_fetched: outcome.pages_fetched,
        records: outcome.records.len(),
        reason: outcome.stop_reason.clone(),
    });
    outcome
}
