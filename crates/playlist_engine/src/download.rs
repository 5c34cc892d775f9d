use std::path::PathBuf;

use engine_logging::{engine_debug, engine_warn};
use playlist_core::{derive_base_name, sanitize_filename, Record};

use crate::collision::resolve_collision;
use crate::media::{watch_url, MediaRetriever, RetrievalError, RetrievalErrorKind};
use crate::persist::ensure_output_dir;
use crate::report::ProgressSink;
use crate::tagging::{LoftyTagger, MetadataTagger, TrackTags};
use crate::{
    AudioQuality, DownloadError, DownloadErrorKind, DownloadOutcome, EngineEvent, MediaFormat,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub target_dir: PathBuf,
    pub format: MediaFormat,
    pub quality: AudioQuality,
    pub embed_metadata: bool,
    /// Written as the album tag, typically the channel name.
    pub album: Option<String>,
}

impl DownloadRequest {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            format: MediaFormat::default(),
            quality: AudioQuality::default(),
            embed_metadata: true,
            album: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub tag_warnings: usize,
}

/// Downloads records one at a time into collision-free files.
pub struct MediaDownloader {
    retriever: Box<dyn MediaRetriever>,
    tagger: Box<dyn MetadataTagger>,
}

impl MediaDownloader {
    pub fn new(retriever: Box<dyn MediaRetriever>) -> Self {
        Self {
            retriever,
            tagger: Box::new(LoftyTagger),
        }
    }

    pub fn with_tagger(mut self, tagger: Box<dyn MetadataTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    /// Downloads one record. Never fails the caller: errors are in the outcome.
    pub async fn download(&self, record: &Record, request: &DownloadRequest) -> DownloadOutcome {
        if !record.has_external_id() {
            return DownloadOutcome::failed(
                record.clone(),
                DownloadError::new(DownloadErrorKind::Unavailable, "record has no external id"),
            );
        }

        if let Err(err) = ensure_output_dir(&request.target_dir) {
            return DownloadOutcome::failed(
                record.clone(),
                DownloadError::new(DownloadErrorKind::Filesystem, err.to_string()),
            );
        }

        let stem = sanitize_filename(&derive_base_name(record));
        let target = match resolve_collision(&request.target_dir, &stem, request.format.extension())
        {
            Ok(path) => path,
            Err(err) => {
                return DownloadOutcome::failed(
                    record.clone(),
                    DownloadError::new(DownloadErrorKind::Filesystem, err.to_string()),
                );
            }
        };
        engine_debug!(
            "Retrieving {} via {} into {}",
            record.external_id,
            self.retriever.name(),
            target.display()
        );

        let written = match self
            .retriever
            .retrieve(&record.external_id, &target, request.format, request.quality)
            .await
        {
            Ok(path) => path,
            Err(err) => return DownloadOutcome::failed(record.clone(), map_retrieval_error(err)),
        };

        let mut tag_warning = None;
        if request.embed_metadata && request.format.supports_tagging() {
            let tags = TrackTags {
                artist: record.artist.clone(),
                title: record.title.clone(),
                album: request.album.clone(),
                comment: Some(watch_url(&record.external_id)),
            };
            if let Err(err) = self.tagger.write_tags(&written, &tags) {
                engine_warn!("Downloaded {} but tagging failed: {}", written.display(), err);
                tag_warning = Some(err.to_string());
            }
        }

        DownloadOutcome::succeeded(record.clone(), written, tag_warning)
    }

    /// Downloads records sequentially; one failure never stops the batch.
    pub async fn download_batch(
        &self,
        records: &[Record],
        request: &DownloadRequest,
        sink: &dyn ProgressSink,
    ) -> (Vec<DownloadOutcome>, BatchSummary) {
        let total = records.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut summary = BatchSummary::default();

        for (i, record) in records.iter().enumerate() {
            let index = i + 1;
            sink.emit(EngineEvent::DownloadStarted {
                index,
                total,
                label: record.label(),
            });

            let outcome = self.download(record, request).await;
            summary.attempted += 1;
            match &outcome.error {
                None => {
                    summary.succeeded += 1;
                    if outcome.tag_warning.is_some() {
                        summary.tag_warnings += 1;
                    }
                }
                Some(err) => {
                    summary.failed += 1;
                    engine_warn!("[{}/{}] {} failed: {}", index, total, record.label(), err);
                }
            }

            sink.emit(EngineEvent::DownloadCompleted {
                index,
                total,
                outcome: outcome.clone(),
            });
            outcomes.push(outcome);
        }

        (outcomes, summary)
    }
}

fn map_retrieval_error(err: RetrievalError) -> DownloadError {
    let kind = match err.kind {
        RetrievalErrorKind::Unavailable => DownloadErrorKind::Unavailable,
        RetrievalErrorKind::Private => DownloadErrorKind::Private,
        RetrievalErrorKind::Failed => DownloadErrorKind::Retrieval,
    };
    DownloadError::new(kind, err.message)
}
