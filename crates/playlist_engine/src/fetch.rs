use std::time::Duration;

use engine_logging::engine_debug;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, DNT, REFERER, USER_AGENT};
use url::Url;

use crate::decode::decode_html;
use crate::extract::{Extractor, PageExtraction, PlaylistExtractor};
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Site root; the playlist lives at `{base_url}/{channel}/playlist`.
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://myonlineradio.de".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "de-DE,de;q=0.9,en;q=0.8".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Paginated playlist endpoint.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        channel: &str,
        page: u32,
        cursor: &str,
    ) -> Result<PageExtraction, FetchError>;
}

/// HTTP page source with a cookie-keeping session.
pub struct PlaylistClient {
    settings: FetchSettings,
    client: reqwest::Client,
    extractor: Box<dyn Extractor>,
}

impl PlaylistClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            client,
            extractor: Box::new(PlaylistExtractor),
        })
    }

    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Loads the channel's playlist page once so the session picks up cookies.
    ///
    /// A 404 here means the channel does not exist.
    pub async fn warm_up(&self, channel: &str) -> Result<(), FetchError> {
        let url = self.playlist_url(channel)?;
        engine_debug!("Warm-up request to {}", url);
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.settings.user_agent)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }

    fn playlist_url(&self, channel: &str) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/{}/playlist",
            self.settings.base_url.trim_end_matches('/'),
            channel
        );
        Url::parse(&raw).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn page_url(&self, channel: &str, page: u32, cursor: &str) -> Result<Url, FetchError> {
        let mut url = self.playlist_url(channel)?;
        url.query_pairs_mut()
            .append_pair("ajax", "1")
            .append_pair("name", "")
            .append_pair("from", "")
            .append_pair("to", "")
            .append_pair("actPage", &page.to_string())
            .append_pair("lastId", cursor);
        Ok(url)
    }

    async fn fetch_body(&self, url: Url, referer: &str) -> Result<(Vec<u8>, Option<String>), FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.settings.user_agent)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, &self.settings.accept_language)
            .header(REFERER, referer)
            .header(DNT, "1")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok((bytes, content_type))
    }
}

#[async_trait::async_trait]
impl PageSource for PlaylistClient {
    async fn fetch_page(
        &self,
        channel: &str,
        page: u32,
        cursor: &str,
    ) -> Result<PageExtraction, FetchError> {
        let url = self.page_url(channel, page, cursor)?;
        let referer = self.playlist_url(channel)?;
        engine_debug!("Fetching page {} of {} (lastId={:?})", page, channel, cursor);

        let (bytes, content_type) = self.fetch_body(url, referer.as_str()).await?;
        let decoded = decode_html(&bytes, content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        engine_debug!(
            "Page {} decoded as {} ({} bytes)",
            page,
            decoded.encoding_label,
            bytes.len()
        );

        Ok(self.extractor.extract_page(&decoded.html))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{FetchSettings, PlaylistClient};

    #[test]
    fn page_url_carries_pagination_query() {
        let client = PlaylistClient::new(FetchSettings {
            base_url: "https://radio.example/".to_string(),
            ..FetchSettings::default()
        })
        .unwrap();
        let url = client.page_url("swr4", 2, "4711").unwrap();
        assert_eq!(url.path(), "/swr4/playlist");
        assert_eq!(
            url.query(),
            Some("ajax=1&name=&from=&to=&actPage=2&lastId=4711")
        );
    }
}
