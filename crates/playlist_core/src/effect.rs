use std::fmt;

/// Work the harvest driver must perform after an `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestEffect {
    /// Request playlist page `page`, passing `cursor` as the last-seen id.
    FetchPage { page: u32, cursor: String },
    /// Wait the inter-page politeness delay before the next request.
    Throttle,
    /// The loop is over; no further effects follow.
    Stop(StopReason),
}

/// Why a harvest ended. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every permitted page was fetched.
    PageLimit,
    /// The requested number of records was collected.
    RecordLimit,
    /// The page contained no playlist items at all.
    EndOfData { page: u32 },
    /// The page had playlist items but none carried an artist or a title.
    /// Usually means the markup changed underneath the extractor.
    UnrecognizedItems { page: u32, items: usize },
    /// The page request failed; records collected so far are kept.
    TransportFailure { page: u32, message: String },
}

impl StopReason {
    /// True for reasons an operator should look at.
    pub fn is_abnormal(&self) -> bool {
        matches!(
            self,
            StopReason::UnrecognizedItems { .. } | StopReason::TransportFailure { .. }
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::PageLimit => write!(f, "page limit reached"),
            StopReason::RecordLimit => write!(f, "record limit reached"),
            StopReason::EndOfData { page } => write!(f, "no more data at page {page}"),
            StopReason::UnrecognizedItems { page, items } => write!(
                f,
                "page {page} had {items} playlist items but none could be read"
            ),
            StopReason::TransportFailure { page, message } => {
                write!(f, "page {page} failed: {message}")
            }
        }
    }
}
