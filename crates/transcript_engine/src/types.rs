use std::fmt;

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Who authored a turn of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Heading label used for the per-turn section of the document.
    pub fn label(self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Gemini",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One extracted turn. `content` borrows from an immutable [`crate::PageSnapshot`],
/// so nothing downstream can alter the page it came from.
#[derive(Debug, Clone, Copy)]
pub struct ChatTurn<'a> {
    pub speaker: Speaker,
    pub content: ElementRef<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTurn {
    pub speaker: Speaker,
    pub markdown: String,
}

/// A code span lifted out of a subtree before structural conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockRecord {
    pub index: usize,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: String,
    pub source_url: String,
    pub created_at: String,
}

/// Reply to an "extract conversation as Markdown" request.
///
/// Serializes as `{"markdownContent": "..."}`; the field is omitted when
/// extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_content: Option<String>,
}

impl MarkdownResponse {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("no chat turns found on the page")]
    NoTurns,
    #[error("every chat turn rendered to empty markdown")]
    EmptyOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector for {slot} ({selector}): {message}")]
pub struct SelectorError {
    pub slot: &'static str,
    pub selector: String,
    pub message: String,
}
