use serde::{Deserialize, Serialize};

/// One played song as listed on a playlist page.
///
/// Field order is the column order of the CSV export. The aliases accept
/// exports written with the older column names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: String,
    pub artist: String,
    #[serde(alias = "song")]
    pub title: String,
    #[serde(alias = "youtube_id")]
    pub external_id: String,
    #[serde(alias = "data_id")]
    pub cursor_token: String,
}

impl Record {
    pub fn new(
        timestamp: impl Into<String>,
        artist: impl Into<String>,
        title: impl Into<String>,
        external_id: impl Into<String>,
        cursor_token: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            artist: artist.into(),
            title: title.into(),
            external_id: external_id.into(),
            cursor_token: cursor_token.into(),
        }
    }

    /// Pagination marker to send when requesting the page after this record.
    ///
    /// Falls back to the external id for records without a `data-id`.
    pub fn pagination_token(&self) -> &str {
        if self.cursor_token.is_empty() {
            &self.external_id
        } else {
            &self.cursor_token
        }
    }

    pub fn has_external_id(&self) -> bool {
        !self.external_id.trim().is_empty()
    }

    /// Short human label for log lines.
    pub fn label(&self) -> String {
        match (self.artist.trim(), self.title.trim()) {
            ("", "") => self.external_id.clone(),
            (artist, "") => artist.to_string(),
            ("", title) => title.to_string(),
            (artist, title) => format!("{artist} - {title}"),
        }
    }
}
