//! Text-level repair passes run on rendered Markdown.
//!
//! All three are pure `&str -> String` functions. Header downgrading and
//! blank-line normalization leave the inside of fenced code blocks alone.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const FENCE: &[u8] = b"```";

/// Level the shallowest heading of a turn is moved to. Levels 1-3 belong to
/// the document title and the per-turn headings.
const FIRST_CONTENT_LEVEL: usize = 4;
const MAX_LEVEL: usize = 6;

static HEADING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)(#{1,6})([ \t]+)").expect("valid heading regex"));
static GAP_BEFORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#+ |---|\*\*Source:\*\*)").expect("valid gap regex"));

/// Where the backtick scan found code: matched fence pairs as byte ranges,
/// plus the number of fences left without a partner.
struct FenceScan {
    fenced: Vec<Range<usize>>,
    unmatched: usize,
}

/// Fenced spans are matched first, then single-backtick spans. An unmatched
/// fence stays in the surrounding prose.
fn scan_fences(text: &str) -> FenceScan {
    let bytes = text.as_bytes();
    let mut scan = FenceScan {
        fenced: Vec::new(),
        unmatched: 0,
    };
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(FENCE) {
            match find(&bytes[i + FENCE.len()..], FENCE) {
                Some(rel) => {
                    let end = i + FENCE.len() + rel + FENCE.len();
                    scan.fenced.push(i..end);
                    i = end;
                }
                None => {
                    scan.unmatched += 1;
                    i += FENCE.len();
                }
            }
        } else if bytes[i] == b'`' {
            match find(&bytes[i + 1..], b"`") {
                Some(rel) => i += 1 + rel + 1,
                None => i += 1,
            }
        } else {
            i += 1;
        }
    }
    scan
}

/// Close a dangling fence.
///
/// Fenced and single-backtick spans are left untouched. A fence left over in
/// the remaining prose means the block was never closed, so a closing fence
/// is appended. Balanced input is returned unchanged.
pub fn repair_backticks(text: &str) -> String {
    if scan_fences(text).unmatched % 2 == 1 {
        format!("{}\n```", text.trim())
    } else {
        text.to_string()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Lines of `text` paired with whether they belong to a fenced block. A line
/// counts when it touches a fenced span that runs over more than one line;
/// a span opened and closed on one line is inline code.
fn fence_aware_lines(text: &str) -> Vec<(&str, bool)> {
    let blocks: Vec<Range<usize>> = scan_fences(text)
        .fenced
        .into_iter()
        .filter(|span| text[span.clone()].contains('\n'))
        .collect();

    let mut start = 0;
    text.split('\n')
        .map(|line| {
            let end = start + line.len();
            let fenced = blocks
                .iter()
                .any(|span| span.start <= end && start < span.end);
            start = end + 1;
            (line, fenced)
        })
        .collect()
}

/// Shift headings so the shallowest one lands on level 4, never past 6.
pub fn downgrade_headers(text: &str) -> String {
    let min_level = fence_aware_lines(text)
        .into_iter()
        .filter(|(_, fenced)| !fenced)
        .filter_map(|(line, _)| HEADING_LINE.captures(line).map(|caps| caps[2].len()))
        .min();
    let Some(min_level) = min_level else {
        return text.to_string();
    };

    let shift = FIRST_CONTENT_LEVEL
        .saturating_sub(min_level)
        .min(MAX_LEVEL.saturating_sub(min_level));
    if shift == 0 {
        return text.to_string();
    }

    fence_aware_lines(text)
        .into_iter()
        .map(|(line, fenced)| {
            if fenced {
                return line.to_string();
            }
            HEADING_LINE
                .replace(line, |caps: &Captures| {
                    let level = (caps[2].len() + shift).min(MAX_LEVEL);
                    format!("{}{}{}", &caps[1], "#".repeat(level), &caps[3])
                })
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_blank(line: &str) -> bool {
    line.chars()
        .all(|c| c.is_whitespace() || c == '\u{feff}' || c == '\u{180e}')
}

/// Drop every blank line, then put exactly one back before headings,
/// horizontal rules and the `**Source:**` metadata line. Idempotent.
pub fn normalize_blank_lines(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let mut lines: Vec<&str> = Vec::new();
    for (line, fenced) in fence_aware_lines(&text) {
        if fenced {
            lines.push(line);
            continue;
        }
        if is_blank(line) {
            continue;
        }
        if GAP_BEFORE.is_match(line) && lines.last().is_some_and(|prev| !prev.is_empty()) {
            lines.push("");
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dangling_fence_is_closed() {
        let repaired = repair_backticks("intro\n```\nlet x = 1;\n");
        assert_eq!(repaired, "intro\n```\nlet x = 1;\n```");
        assert_eq!(repaired.matches("```").count() % 2, 0);
    }

    #[test]
    fn balanced_spans_are_untouched() {
        let text = "use `a` and\n```\nb\n```\ndone";
        assert_eq!(repair_backticks(text), text);
    }

    #[test]
    fn repair_is_idempotent() {
        let once = repair_backticks("x\n```rust\nfn a() {}");
        assert_eq!(repair_backticks(&once), once);
    }

    #[test]
    fn non_ascii_prose_is_scanned_safely() {
        let text = "日本語 `コード` テキスト";
        assert_eq!(repair_backticks(text), text);
    }

    #[test]
    fn shallowest_heading_lands_on_level_four() {
        let out = downgrade_headers("# Title\nBody\n## Sub\n  ### Deep");
        assert_eq!(out, "#### Title\nBody\n##### Sub\n  ###### Deep");
    }

    #[test]
    fn downgrade_clamps_at_six() {
        assert_eq!(downgrade_headers("# A\n###### F"), "#### A\n###### F");
    }

    #[test]
    fn deep_headings_are_left_alone() {
        assert_eq!(downgrade_headers("##### A\n###### B"), "##### A\n###### B");
        assert_eq!(downgrade_headers("no headings"), "no headings");
    }

    #[test]
    fn hashes_without_space_are_not_headings() {
        assert_eq!(downgrade_headers("#tag\n## Real"), "#tag\n#### Real");
    }

    #[test]
    fn code_comments_are_not_downgraded() {
        let text = "## Run\n```\n# install\npip install x\n```";
        assert_eq!(
            downgrade_headers(text),
            "#### Run\n```\n# install\npip install x\n```"
        );
    }

    #[test]
    fn blank_lines_collapse_and_gaps_return_before_structure() {
        let text = "# T\r\n\r\n\r\n**Source:** x\n**Created:** y\n   \n---\n## User\nhi\n\n\nthere\n";
        assert_eq!(
            normalize_blank_lines(text),
            "# T\n\n**Source:** x\n**Created:** y\n\n---\n\n## User\nhi\nthere"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let text = "\n\n# A\n\n\ntext\n## User\n\u{3000}\nmore\n---\n";
        let once = normalize_blank_lines(text);
        assert_eq!(normalize_blank_lines(&once), once);
    }

    #[test]
    fn fenced_blank_lines_survive_normalization() {
        let text = "a\n```\nline1\n\nline2\n```\nb";
        assert_eq!(normalize_blank_lines(text), text);
    }

    #[test]
    fn single_line_fence_pair_is_inline_code() {
        let text = "```x``` is a fence\n# Title\nA\n\nB";
        assert_eq!(repair_backticks(text), text);
        assert_eq!(
            downgrade_headers(text),
            "```x``` is a fence\n#### Title\nA\n\nB"
        );
        assert_eq!(
            normalize_blank_lines(text),
            "```x``` is a fence\n\n# Title\nA\nB"
        );
    }

    #[test]
    fn fence_block_after_inline_fence_is_still_opaque() {
        let text = "```a``` then\n```\n# comment\n\nx\n```\n# Real";
        assert_eq!(
            downgrade_headers(text),
            "```a``` then\n```\n# comment\n\nx\n```\n#### Real"
        );
        assert_eq!(normalize_blank_lines(text), "```a``` then\n```\n# comment\n\nx\n```\n\n# Real");
    }
}
