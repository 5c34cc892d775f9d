use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use playlist_core::{Record, StopReason};

/// Progress notifications emitted to a [`crate::ProgressSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageFetched {
        page: u32,
        records: usize,
        total: usize,
    },
    HarvestFinished {
        pages_fetched: u32,
        records: usize,
        reason: StopReason,
    },
    DownloadStarted {
        index: usize,
        total: usize,
        label: String,
    },
    DownloadCompleted {
        index: usize,
        total: usize,
        outcome: DownloadOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "undecodable response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Container requested from the media retriever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFormat {
    #[default]
    Mp3,
    M4a,
    Opus,
    Flac,
    Wav,
    Mp4,
    Webm,
}

impl MediaFormat {
    pub fn extension(self) -> &'static str {
        match self {
            MediaFormat::Mp3 => "mp3",
            MediaFormat::M4a => "m4a",
            MediaFormat::Opus => "opus",
            MediaFormat::Flac => "flac",
            MediaFormat::Wav => "wav",
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Webm => "webm",
        }
    }

    pub fn is_audio(self) -> bool {
        !matches!(self, MediaFormat::Mp4 | MediaFormat::Webm)
    }

    /// Only mp3 files get artist/title tags written after download.
    pub fn supports_tagging(self) -> bool {
        matches!(self, MediaFormat::Mp3)
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for MediaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp3" => Ok(MediaFormat::Mp3),
            "m4a" => Ok(MediaFormat::M4a),
            "opus" => Ok(MediaFormat::Opus),
            "flac" => Ok(MediaFormat::Flac),
            "wav" => Ok(MediaFormat::Wav),
            "mp4" => Ok(MediaFormat::Mp4),
            "webm" => Ok(MediaFormat::Webm),
            other => Err(format!(
                "unsupported format '{other}' (expected mp3, m4a, opus, flac, wav, mp4 or webm)"
            )),
        }
    }
}

/// Audio bitrate for extraction, or whatever the source offers at best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioQuality {
    #[default]
    Best,
    Kbps(u32),
}

impl fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioQuality::Best => f.write_str("best"),
            AudioQuality::Kbps(rate) => write!(f, "{rate}k"),
        }
    }
}

impl FromStr for AudioQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        if value == "best" {
            return Ok(AudioQuality::Best);
        }
        let digits = value.strip_suffix('k').unwrap_or(&value);
        match digits.parse::<u32>() {
            Ok(rate) if rate > 0 => Ok(AudioQuality::Kbps(rate)),
            _ => Err(format!(
                "invalid quality '{s}' (expected 'best' or a bitrate such as 192 or 320k)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadErrorKind {
    Unavailable,
    Private,
    Retrieval,
    Filesystem,
}

impl fmt::Display for DownloadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadErrorKind::Unavailable => write!(f, "unavailable"),
            DownloadErrorKind::Private => write!(f, "private"),
            DownloadErrorKind::Retrieval => write!(f, "retrieval error"),
            DownloadErrorKind::Filesystem => write!(f, "filesystem error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadError {
    pub kind: DownloadErrorKind,
    pub message: String,
}

impl DownloadError {
    pub(crate) fn new(kind: DownloadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of one download attempt. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub record: Record,
    pub resolved_path: Option<PathBuf>,
    pub error: Option<DownloadError>,
    /// Set when the file was downloaded but tags could not be written.
    pub tag_warning: Option<String>,
}

impl DownloadOutcome {
    pub(crate) fn succeeded(record: Record, path: PathBuf, tag_warning: Option<String>) -> Self {
        Self {
            record,
            resolved_path: Some(path),
            error: None,
            tag_warning,
        }
    }

    pub(crate) fn failed(record: Record, error: DownloadError) -> Self {
        Self {
            record,
            resolved_path: None,
            error: Some(error),
            tag_warning: None,
        }
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_kind(&self) -> Option<DownloadErrorKind> {
        self.error.as_ref().map(|err| err.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::{AudioQuality, MediaFormat};

    #[test]
    fn quality_parses_best_and_bitrates() {
        assert_eq!("best".parse::<AudioQuality>(), Ok(AudioQuality::Best));
        assert_eq!("BEST".parse::<AudioQuality>(), Ok(AudioQuality::Best));
        assert_eq!("192".parse::<AudioQuality>(), Ok(AudioQuality::Kbps(192)));
        assert_eq!("320k".parse::<AudioQuality>(), Ok(AudioQuality::Kbps(320)));
        assert!("0".parse::<AudioQuality>().is_err());
        assert!("loud".parse::<AudioQuality>().is_err());
    }

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!("MP3".parse::<MediaFormat>(), Ok(MediaFormat::Mp3));
        assert_eq!("webm".parse::<MediaFormat>(), Ok(MediaFormat::Webm));
        assert!("ogg".parse::<MediaFormat>().is_err());
        assert!(MediaFormat::Mp3.supports_tagging());
        assert!(!MediaFormat::Flac.supports_tagging());
        assert!(!MediaFormat::Mp4.is_audio());
    }
}
