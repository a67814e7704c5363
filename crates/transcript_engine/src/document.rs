use once_cell::sync::Lazy;
use regex::Regex;

use crate::cleanup::normalize_blank_lines;
use crate::types::{DocumentMetadata, RenderedTurn};

/// What the "Gemini Chat Record" fallback reduces to once cleaned.
pub const DEFAULT_TITLE: &str = "Chat_Record";
pub const UNKNOWN_DATE: &str = "Unknown Date";

static BRAND_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Gemini[_\s-]*").expect("valid brand prefix regex"));
static SITE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*Gemini$").expect("valid site suffix regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Drop the ` - Gemini` suffix browsers show in the page title.
pub fn strip_site_suffix(page_title: &str) -> String {
    SITE_SUFFIX.replace(page_title.trim(), "").trim().to_string()
}

/// ASCII letters and digits, CJK unified ideographs and whitespace survive.
pub(crate) fn is_title_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fff}').contains(&c) || c.is_whitespace()
}

/// Brand prefix stripped, punctuation removed, whitespace runs joined by `_`.
/// Falls back to [`DEFAULT_TITLE`] when nothing is left.
pub fn clean_title(raw: &str) -> String {
    let unbranded = BRAND_PREFIX.replace(raw.trim(), "");
    let kept: String = unbranded.chars().filter(|&c| is_title_char(c)).collect();
    let kept = BRAND_PREFIX.replace(kept.trim(), "");
    let title = WHITESPACE_RUN.replace_all(kept.trim(), "_").into_owned();
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

/// Title block, metadata, then one `## <speaker>` section per turn in order,
/// normalized as a whole.
pub fn build_markdown_document(metadata: &DocumentMetadata, turns: &[RenderedTurn]) -> String {
    let mut doc = format!(
        "# {title}\n\n**Source:** [{url}]({url})\n**Created:** {created}\n\n---\n\n",
        title = metadata.title,
        url = metadata.source_url,
        created = metadata.created_at,
    );
    for turn in turns {
        doc.push_str(&format!("## {}\n{}\n\n", turn.speaker.label(), turn.markdown));
    }
    normalize_blank_lines(&doc)
}
