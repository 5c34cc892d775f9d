//! Optional RON settings file.
//!
//! Every field is optional; anything left out keeps the built-in default.
//!
//! ```ron
//! (
//!     base_url: Some("https://myonlineradio.de"),
//!     request_timeout_secs: Some(20),
//!     page_delay_ms: Some(1500),
//!     yt_dlp_path: Some("/usr/local/bin/yt-dlp"),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use playlist_engine::{FetchSettings, HarvestSettings};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub page_delay_ms: Option<u64>,
    pub warmup_delay_ms: Option<u64>,
    pub yt_dlp_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let mut settings = FetchSettings::default();
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(user_agent) = &self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout = Duration::from_secs(secs);
        }
        settings
    }

    pub fn harvest_settings(&self) -> HarvestSettings {
        let mut settings = HarvestSettings::default();
        if let Some(ms) = self.page_delay_ms {
            settings.page_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.warmup_delay_ms {
            settings.warmup_delay = Duration::from_millis(ms);
        }
        settings
    }
}
