use std::ffi::OsString;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_trace};
use thiserror::Error;
use tokio::process::Command;

use crate::{AudioQuality, MediaFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalErrorKind {
    Unavailable,
    Private,
    Failed,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RetrievalError {
    pub kind: RetrievalErrorKind,
    pub message: String,
}

impl RetrievalError {
    pub fn new(kind: RetrievalErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Turns a video id into a media file on disk.
#[async_trait::async_trait]
pub trait MediaRetriever: Send + Sync {
    /// Downloads `external_id` to `target` and returns the path actually written,
    /// which may differ from `target` if the tool picked another extension.
    async fn retrieve(
        &self,
        external_id: &str,
        target: &Path,
        format: MediaFormat,
        quality: AudioQuality,
    ) -> Result<PathBuf, RetrievalError>;

    fn name(&self) -> &'static str;
}

/// Retriever backed by the external `yt-dlp` binary.
#[derive(Debug, Clone)]
pub struct YtDlpRetriever {
    binary_path: PathBuf,
}

impl YtDlpRetriever {
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Looks for `yt-dlp` in PATH.
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

#[async_trait::async_trait]
impl MediaRetriever for YtDlpRetriever {
    async fn retrieve(
        &self,
        external_id: &str,
        target: &Path,
        format: MediaFormat,
        quality: AudioQuality,
    ) -> Result<PathBuf, RetrievalError> {
        let args = build_args(external_id, target, format, quality);
        engine_trace!("{} {:?}", self.binary_path.display(), args);

        let output = Command::new(&self.binary_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                RetrievalError::new(
                    RetrievalErrorKind::Failed,
                    format!("failed to execute {}: {}", self.binary_path.display(), e),
                )
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(RetrievalError::new(
                classify_failure(&stderr),
                error_summary(&stderr, output.status.code()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(PathBuf::from);
        engine_debug!("yt-dlp reported final path {:?}", reported);

        match reported {
            Some(path) if path.exists() => Ok(path),
            _ if target.exists() => Ok(target.to_path_buf()),
            _ => Err(RetrievalError::new(
                RetrievalErrorKind::Failed,
                format!("yt-dlp finished but {} was not created", target.display()),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

pub(crate) fn watch_url(external_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={external_id}")
}

fn build_args(
    external_id: &str,
    target: &Path,
    format: MediaFormat,
    quality: AudioQuality,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--no-playlist".into(),
        "--no-progress".into(),
        "--no-overwrites".into(),
    ];

    let ext = format.extension();
    if format.is_audio() {
        let audio_quality = match quality {
            AudioQuality::Best => "0".to_string(),
            AudioQuality::Kbps(rate) => format!("{rate}K"),
        };
        args.extend(
            [
                "-f",
                "bestaudio/best",
                "--extract-audio",
                "--audio-format",
                ext,
                "--audio-quality",
                audio_quality.as_str(),
            ]
            .map(OsString::from),
        );
    } else {
        let selector = format!("bestvideo[ext={ext}]+bestaudio/best[ext={ext}]/best");
        args.extend(
            ["-f", selector.as_str(), "--remux-video", ext].map(OsString::from),
        );
    }

    args.push("-o".into());
    args.push(output_template(target).into());
    args.extend(["--print", "after_move:filepath"].map(OsString::from));
    args.push(watch_url(external_id).into());
    args
}

/// yt-dlp output template for `target`: extension replaced by `%(ext)s`,
/// literal `%` escaped.
fn output_template(target: &Path) -> String {
    let stem_path = target.with_extension("");
    let escaped = stem_path.to_string_lossy().replace('%', "%%");
    format!("{escaped}.%(ext)s")
}

fn classify_failure(stderr: &str) -> RetrievalErrorKind {
    const PRIVATE_MARKERS: &[&str] = &["private video", "video is private"];
    const UNAVAILABLE_MARKERS: &[&str] = &[
        "video unavailable",
        "this video is not available",
        "not available in your country",
        "no longer available",
        "has been removed",
        "does not exist",
        "has been terminated",
        "incomplete youtube id",
    ];

    let lower = stderr.to_lowercase();
    if lower.contains("requested format is not available") {
        RetrievalErrorKind::Failed
    } else if PRIVATE_MARKERS.iter().any(|m| lower.contains(m)) {
        RetrievalErrorKind::Private
    } else if UNAVAILABLE_MARKERS.iter().any(|m| lower.contains(m)) {
        RetrievalErrorKind::Unavailable
    } else {
        RetrievalErrorKind::Failed
    }
}

fn error_summary(stderr: &str, code: Option<i32>) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let line = lines
        .iter()
        .rev()
        .find(|line| line.starts_with("ERROR:"))
        .or(lines.last());
    match (line, code) {
        (Some(line), _) => line.to_string(),
        (None, Some(code)) => format!("yt-dlp exited with status {code}"),
        (None, None) => "yt-dlp was terminated by a signal".to_string(),
    }
}
