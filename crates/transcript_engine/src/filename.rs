use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::is_title_char;

const FILE_PREFIX: &str = "GeminiChatRecord";
const FALLBACK_TITLE: &str = "Untitled";
const MAX_TITLE_CHARS: usize = 80;

static BRAND_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Gemini\s*").expect("valid brand prefix regex"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// `GeminiChatRecord-{YYYYMMDD}-{HHMMSS}-{title}.md`, with the title taken from
/// the document's leading `#` heading.
pub fn download_filename(markdown: &str, saved_at: NaiveDateTime) -> String {
    let title = markdown
        .lines()
        .next()
        .and_then(|line| line.strip_prefix('#'))
        .map(sanitize_title)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());
    format!(
        "{FILE_PREFIX}-{stamp}-{title}.md",
        stamp = saved_at.format("%Y%m%d-%H%M%S")
    )
}

fn sanitize_title(raw: &str) -> String {
    let unbranded = BRAND_PREFIX.replace(raw.trim(), "");
    let kept: String = unbranded.chars().filter(|&c| is_title_char(c)).collect();
    let joined = WHITESPACE_RUN.replace_all(kept.trim(), "_");
    joined.chars().take(MAX_TITLE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 2)
            .unwrap()
    }

    #[test]
    fn title_from_first_heading() {
        let name = download_filename("# Rust tips and tricks\n\n**Source:** x", at());
        assert_eq!(name, "GeminiChatRecord-20250307-090502-Rust_tips_and_tricks.md");
    }

    #[test]
    fn underscores_and_brand_are_dropped() {
        let name = download_filename("# Gemini Trip_planning 2025!\n", at());
        assert_eq!(name, "GeminiChatRecord-20250307-090502-Tripplanning_2025.md");
    }

    #[test]
    fn missing_heading_uses_fallback() {
        let name = download_filename("no heading here", at());
        assert_eq!(name, "GeminiChatRecord-20250307-090502-Untitled.md");
    }

    #[test]
    fn long_titles_are_capped() {
        let markdown = format!("# {}\n", "a".repeat(200));
        let name = download_filename(&markdown, at());
        let title = name
            .trim_start_matches("GeminiChatRecord-20250307-090502-")
            .trim_end_matches(".md");
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
    }
}
