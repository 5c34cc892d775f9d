//! Playlist engine: page fetching, harvest driver, CSV persistence and media downloads.
mod collision;
mod decode;
mod download;
mod export;
mod extract;
mod fetch;
mod harvest;
mod media;
mod persist;
mod report;
mod tagging;
mod types;

pub use collision::{resolve_collision, CollisionError, MAX_COLLISION_ATTEMPTS};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use download::{BatchSummary, DownloadRequest, MediaDownloader};
pub use export::{load_records, persist_records, PersistOutcome};
pub use extract::{extract, Extractor, PageExtraction, PlaylistExtractor};
pub use fetch::{FetchSettings, PageSource, PlaylistClient};
pub use harvest::{harvest, HarvestSettings};
pub use media::{MediaRetriever, RetrievalError, RetrievalErrorKind, YtDlpRetriever};
pub use persist::{ensure_output_dir, write_atomically, PersistError};
pub use report::{LogSink, ProgressSink, QuietSink};
pub use tagging::{LoftyTagger, MetadataTagger, TagError, TrackTags};
pub use types::{
    AudioQuality, DownloadError, DownloadErrorKind, DownloadOutcome, EngineEvent, FailureKind,
    FetchError, MediaFormat,
};
