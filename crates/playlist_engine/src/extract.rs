use std::sync::OnceLock;

use playlist_core::Record;
use scraper::{ElementRef, Html, Selector};

/// Records found on one page plus the number of candidate items before
/// filtering, so callers can tell an empty page from unreadable markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageExtraction {
    pub records: Vec<Record>,
    pub item_count: usize,
}

pub trait Extractor: Send + Sync {
    fn extract_page(&self, html: &str) -> PageExtraction;
}

/// Reads myonlineradio playlist markup:
/// - every element with a `data-youtube` attribute is one played track
/// - `data-id` is the pagination id
/// - artist, title and time come from the first matching descendant span
///
/// Items with neither artist nor title are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaylistExtractor;

struct Selectors {
    item: Selector,
    artist: Selector,
    title: Selector,
    time: Selector,
}

static SELECTORS: OnceLock<Option<Selectors>> = OnceLock::new();

/// Compiled once per process and shared by every extraction.
fn selectors() -> Option<&'static Selectors> {
    SELECTORS.get_or_init(Selectors::parse).as_ref()
}

impl Selectors {
    fn parse() -> Option<Self> {
        Some(Self {
            item: Selector::parse("[data-youtube]").ok()?,
            artist: Selector::parse(r#"span[itemprop="byArtist"]"#).ok()?,
            title: Selector::parse(r#"span[itemprop="name"]"#).ok()?,
            time: Selector::parse("span.txt2.mcolumn").ok()?,
        })
    }
}

impl Extractor for PlaylistExtractor {
    fn extract_page(&self, html: &str) -> PageExtraction {
        let Some(selectors) = selectors() else {
            return PageExtraction::default();
        };
        let doc = Html::parse_document(html);

        let mut extraction = PageExtraction::default();
        for item in doc.select(&selectors.item) {
            extraction.item_count += 1;

            let artist = first_text(item, &selectors.artist);
            let title = first_text(item, &selectors.title);
            if artist.is_empty() && title.is_empty() {
                continue;
            }

            let attr = |name: &str| item.value().attr(name).unwrap_or_default().trim().to_string();
            extraction.records.push(Record {
                timestamp: first_text(item, &selectors.time),
                artist,
                title,
                external_id: attr("data-youtube"),
                cursor_token: attr("data-id"),
            });
        }
        extraction
    }
}

/// Convenience wrapper returning only the records.
pub fn extract(html: &str) -> Vec<Record> {
    PlaylistExtractor.extract_page(html).records
}

fn first_text(item: ElementRef<'_>, selector: &Selector) -> String {
    item.select(selector)
        .next()
        .map(|el| el.text().map(str::trim).collect::<String>())
        .unwrap_or_default()
}
