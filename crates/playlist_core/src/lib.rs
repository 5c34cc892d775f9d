//! Playlist core: pure harvest state machine, deduplication and naming rules.
mod dedupe;
mod effect;
mod filename;
mod msg;
mod output;
mod record;
mod state;
mod update;

pub use dedupe::{dedupe, dedupe_with_summary, DedupeSummary};
pub use effect::{HarvestEffect, StopReason};
pub use filename::{derive_base_name, sanitize_filename, MAX_FILENAME_CHARS, PLACEHOLDER_NAME};
pub use msg::HarvestMsg;
pub use output::{default_output_path, OutputMode, OutputTarget, RecordSelection};
pub use record::Record;
pub use state::{HarvestOutcome, HarvestRequest, HarvestState};
pub use update::update;
