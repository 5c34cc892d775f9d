#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use playlist_engine::{EngineEvent, ProgressSink};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct Item<'a> {
    pub youtube: &'a str,
    pub id: &'a str,
    pub time: &'a str,
    pub artist: &'a str,
    pub title: &'a str,
}

/// Playlist markup in the shape the site serves.
pub fn playlist_html(items: &[Item<'_>]) -> String {
    let mut html = String::from("<html><body><div class=\"playlist\">\n");
    for item in items {
        html.push_str(&format!(
            concat!(
                "<div class=\"pl-item\" data-youtube=\"{}\" data-id=\"{}\">",
                "<span class=\"txt2 mcolumn\">{}</span>",
                "<span itemprop=\"byArtist\">{}</span>",
                "<span itemprop=\"name\">{}</span>",
                "</div>\n"
            ),
            item.youtube, item.id, item.time, item.artist, item.title
        ));
    }
    html.push_str("</div></body></html>");
    html
}
