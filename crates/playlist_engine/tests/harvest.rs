mod common;

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use common::{init_logging, playlist_html, Item, TestSink};
use playlist_core::{HarvestRequest, Record, StopReason};
use playlist_engine::{
    harvest, EngineEvent, FailureKind, FetchError, FetchSettings, HarvestSettings, PageExtraction,
    PageSource, PlaylistClient,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves canned pages and records the (page, cursor) pairs it was asked for.
struct ScriptedSource {
    pages: Mutex<VecDeque<Result<PageExtraction, FetchError>>>,
    calls: Mutex<Vec<(u32, String)>>,
}

impl ScriptedSource {
    fn new(pages: Vec<Result<PageExtraction, FetchError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(u32, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PageSource for ScriptedSource {
    async fn fetch_page(
        &self,
        _channel: &str,
        page: u32,
        cursor: &str,
    ) -> Result<PageExtraction, FetchError> {
        self.calls.lock().unwrap().push((page, cursor.to_string()));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PageExtraction::default()))
    }
}

fn records(prefix: &str, count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new(
                "",
                format!("{prefix}-artist-{i}"),
                format!("{prefix}-title-{i}"),
                format!("{prefix}-yt-{i}"),
                format!("{prefix}-id-{i}"),
            )
        })
        .collect()
}

fn page(records: Vec<Record>) -> Result<PageExtraction, FetchError> {
    let item_count = records.len();
    Ok(PageExtraction {
        records,
        item_count,
    })
}

fn no_delay() -> HarvestSettings {
    HarvestSettings {
        page_delay: Duration::ZERO,
        warmup_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn empty_second_page_ends_harvest_with_first_page_records() {
    init_logging();
    let source = ScriptedSource::new(vec![page(records("p1", 4)), page(Vec::new()), page(records("p3", 4))]);
    let request = HarvestRequest::new("swr4", 3);

    let outcome = harvest(&source, &request, &no_delay(), &TestSink::new()).await;

    assert_eq!(outcome.records, records("p1", 4));
    assert_eq!(outcome.stop_reason, StopReason::EndOfData { page: 2 });
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(source.calls().len(), 2);
}

#[tokio::test]
async fn record_limit_truncates_concatenated_pages() {
    init_logging();
    let source = ScriptedSource::new(vec![page(records("p1", 4)), page(records("p2", 4))]);
    let request = HarvestRequest::new("swr4", 10).with_max_records(Some(5));

    let outcome = harvest(&source, &request, &no_delay(), &TestSink::new()).await;

    let mut expected = records("p1", 4);
    expected.push(records("p2", 1).remove(0));
    assert_eq!(outcome.records, expected);
    assert_eq!(outcome.stop_reason, StopReason::RecordLimit);
    assert_eq!(source.calls().len(), 2);
}

#[tokio::test]
async fn cursor_follows_last_record_of_each_page() {
    init_logging();
    let source = ScriptedSource::new(vec![page(records("p1", 2)), page(records("p2", 3)), page(records("p3", 1))]);
    let request = HarvestRequest::new("swr4", 3).with_start_cursor("start");

    let outcome = harvest(&source, &request, &no_delay(), &TestSink::new()).await;

    assert_eq!(
        source.calls(),
        vec![
            (1, "start".to_string()),
            (2, "p1-id-1".to_string()),
            (3, "p2-id-2".to_string()),
        ]
    );
    assert_eq!(outcome.stop_reason, StopReason::PageLimit);
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.last_cursor, "p3-id-0");
    assert_eq!(outcome.records.len(), 6);
}

#[tokio::test]
async fn transport_failure_keeps_collected_records() {
    init_logging();
    let source = ScriptedSource::new(vec![
        page(records("p1", 3)),
        Err(FetchError {
            kind: FailureKind::Timeout,
            message: "operation timed out".to_string(),
        }),
    ]);
    let request = HarvestRequest::new("swr4", 5);
    let sink = TestSink::new();

    let outcome = harvest(&source, &request, &no_delay(), &sink).await;

    assert_eq!(outcome.records.len(), 3);
    assert!(matches!(
        outcome.stop_reason,
        StopReason::TransportFailure { page: 2, .. }
    ));

    let events = sink.take();
    assert_eq!(
        events.first(),
        Some(&EngineEvent::PageFetched {
            page: 1,
            records: 3,
            total: 3
        })
    );
    assert!(matches!(
        events.last(),
        Some(EngineEvent::HarvestFinished { records: 3, .. })
    ));
}

#[tokio::test]
async fn pages_are_spaced_by_the_politeness_delay() {
    init_logging();
    let source = ScriptedSource::new(vec![page(records("p1", 1)), page(records("p2", 1)), page(records("p3", 1))]);
    let request = HarvestRequest::new("swr4", 3);
    let settings = HarvestSettings {
        page_delay: Duration::from_millis(40),
        ..no_delay()
    };

    let started = std::time::Instant::now();
    let outcome = harvest(&source, &request, &settings, &TestSink::new()).await;

    // Two gaps between three pages, none after the last one.
    assert!(started.elapsed() >= Duration::from_millis(80));
    assert_eq!(outcome.records.len(), 3);
}

#[tokio::test]
async fn harvest_over_http_walks_pages_until_empty() {
    init_logging();
    let server = MockServer::start().await;
    let first = playlist_html(&[
        Item { youtube: "a", id: "11", time: "10:00", artist: "A", title: "One" },
        Item { youtube: "b", id: "12", time: "10:04", artist: "B", title: "Two" },
    ]);
    let second = playlist_html(&[Item { youtube: "a", id: "13", time: "10:08", artist: "A", title: "One" }]);

    Mock::given(method("GET"))
        .and(path("/swr4/playlist"))
        .and(query_param("actPage", "1"))
        .and(query_param("lastId", ""))
        .respond_with(ResponseTemplate::new(200).set_body_raw(first, "text/html"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/swr4/playlist"))
        .and(query_param("actPage", "2"))
        .and(query_param("lastId", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(second, "text/html"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/swr4/playlist"))
        .and(query_param("actPage", "3"))
        .and(query_param("lastId", "13"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html><body></body></html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let client = PlaylistClient::new(FetchSettings {
        base_url: server.uri(),
        ..FetchSettings::default()
    })
    .unwrap();
    let request = HarvestRequest::new("swr4", 5);

    let outcome = harvest(&client, &request, &no_delay(), &TestSink::new()).await;

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.stop_reason, StopReason::EndOfData { page: 3 });
    assert_eq!(outcome.last_cursor, "13");
}
