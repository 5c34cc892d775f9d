use crate::{Record, StopReason};

/// Parameters of one harvest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestRequest {
    pub channel: String,
    pub max_pages: u32,
    pub max_records: Option<usize>,
    pub start_cursor: String,
}

impl HarvestRequest {
    pub fn new(channel: impl Into<String>, max_pages: u32) -> Self {
        Self {
            channel: channel.into(),
            max_pages,
            max_records: None,
            start_cursor: String::new(),
        }
    }

    pub fn with_max_records(mut self, max_records: Option<usize>) -> Self {
        self.max_records = max_records;
        self
    }

    pub fn with_start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = cursor.into();
        self
    }
}

/// Accumulator owned by a single harvest loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestState {
    max_pages: u32,
    max_records: Option<usize>,
    start_cursor: String,
    cursor: String,
    next_page: u32,
    pages_fetched: u32,
    records: Vec<Record>,
}

impl HarvestState {
    pub fn new(request: &HarvestRequest) -> Self {
        Self {
            max_pages: request.max_pages,
            max_records: request.max_records,
            start_cursor: request.start_cursor.clone(),
            cursor: request.start_cursor.clone(),
            next_page: 1,
            pages_fetched: 0,
            records: Vec::new(),
        }
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub(crate) fn record_limit_reached(&self) -> bool {
        self.max_records
            .is_some_and(|limit| self.records.len() >= limit)
    }

    pub(crate) fn append_page(&mut self, page: u32, records: Vec<Record>) {
        if let Some(last) = records.last() {
            self.cursor = last.pagination_token().to_string();
        }
        self.records.extend(records);
        self.pages_fetched = page;
        self.next_page = page + 1;
    }

    /// Ends the run, truncating to the record limit when the last page overshot.
    ///
    /// After truncation the cursor points at the last kept record, so a resumed
    /// run picks up the records that were cut off.
    pub fn finish(self, stop_reason: StopReason) -> HarvestOutcome {
        let mut records = self.records;
        let mut last_cursor = self.cursor;
        if let Some(limit) = self.max_records.filter(|&limit| records.len() > limit) {
            records.truncate(limit);
            last_cursor = records
                .last()
                .map(|record| record.pagination_token().to_string())
                .unwrap_or(self.start_cursor);
        }
        HarvestOutcome {
            records,
            pages_fetched: self.pages_fetched,
            last_cursor,
            stop_reason,
        }
    }
}

/// Result of a finished harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    pub records: Vec<Record>,
    pub pages_fetched: u32,
    /// Cursor to resume from in a later run.
    pub last_cursor: String,
    pub stop_reason: StopReason,
}
