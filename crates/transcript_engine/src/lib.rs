//! Transcript engine: share-page extraction and HTML-to-Markdown rendering.
mod cleanup;
mod code;
mod convert;
mod decode;
mod document;
mod dom;
mod extract;
mod filename;
mod math;
mod page;
mod persist;
mod pipeline;
mod selectors;
mod table;
mod types;

pub use cleanup::{downgrade_headers, normalize_blank_lines, repair_backticks};
pub use code::{placeholder, CodeShield};
pub use convert::{Converter, TranscriptConverter};
pub use decode::{decode_html, DecodeError, DecodedHtml, EncodingSource};
pub use document::{build_markdown_document, clean_title, DEFAULT_TITLE, UNKNOWN_DATE};
pub use extract::{Extractor, ShareTurnExtractor};
pub use filename::download_filename;
pub use page::PageSnapshot;
pub use persist::{ensure_output_dir, MarkdownSaver, PersistError};
pub use pipeline::{render_turn, MarkdownExporter};
pub use selectors::{CandidateChain, CompiledSelectors, PageSelectors};
pub use types::{
    ChatTurn, CodeBlockRecord, DocumentMetadata, ExtractionError, MarkdownResponse, RenderedTurn,
    SelectorError, Speaker,
};
