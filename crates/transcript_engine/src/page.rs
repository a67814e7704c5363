use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use transcript_logging::transcript_debug;

use crate::document::{clean_title, strip_site_suffix, UNKNOWN_DATE};
use crate::dom::rendered_text;
use crate::selectors::CompiledSelectors;
use crate::types::DocumentMetadata;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid title selector"));

/// Locale labels the share page puts in front of the publish timestamp.
const PUBLISH_LABELS: &[&str] = &["发布时间：", "發布時間：", "Published"];

/// Read-only snapshot of a share page plus the URL it was loaded from.
///
/// Everything downstream (extraction, metadata, rendering) reads from this
/// one parsed document; nothing queries global page state.
#[derive(Debug)]
pub struct PageSnapshot {
    document: Html,
    source_url: String,
}

impl PageSnapshot {
    pub fn parse(html: &str, source_url: impl Into<String>) -> Self {
        Self {
            document: Html::parse_document(html),
            source_url: source_url.into(),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn metadata(&self, selectors: &CompiledSelectors) -> DocumentMetadata {
        DocumentMetadata {
            title: clean_title(&self.raw_title(selectors)),
            source_url: self.source_url.clone(),
            created_at: self.publish_time(selectors),
        }
    }

    /// Primary heading text, else the `<title>` without its site suffix.
    fn raw_title(&self, selectors: &CompiledSelectors) -> String {
        let heading = self
            .document
            .select(&selectors.title_heading)
            .next()
            .map(|h| rendered_text(h).trim().to_string())
            .filter(|text| !text.is_empty());
        if let Some(heading) = heading {
            return heading;
        }
        transcript_debug!("no title heading on page; falling back to <title>");
        self.document
            .select(&TITLE)
            .next()
            .map(|t| strip_site_suffix(&t.text().collect::<String>()))
            .unwrap_or_default()
    }

    fn publish_time(&self, selectors: &CompiledSelectors) -> String {
        let text = self
            .document
            .select(&selectors.publish_time)
            .next()
            .map(|el| strip_publish_label(&rendered_text(el)))
            .filter(|text| !text.is_empty());
        match text {
            Some(text) => text,
            None => {
                transcript_debug!("no publish time on page");
                UNKNOWN_DATE.to_string()
            }
        }
    }
}

fn strip_publish_label(raw: &str) -> String {
    let trimmed = raw.trim();
    PUBLISH_LABELS
        .iter()
        .find_map(|label| trimmed.strip_prefix(label))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
