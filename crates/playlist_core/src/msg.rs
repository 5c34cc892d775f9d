use crate::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestMsg {
    /// Kick off the loop.
    Start,
    /// A page was fetched and extracted.
    PageLoaded {
        page: u32,
        records: Vec<Record>,
        /// Candidate items seen in the markup before filtering.
        item_count: usize,
    },
    /// The page request failed at the transport or HTTP level.
    PageFailed { page: u32, message: String },
}
