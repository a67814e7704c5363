use transcript_logging::{transcript_info, transcript_warn};

use crate::cleanup::{downgrade_headers, repair_backticks};
use crate::convert::{Converter, TranscriptConverter};
use crate::document::build_markdown_document;
use crate::extract::{Extractor, ShareTurnExtractor};
use crate::page::PageSnapshot;
use crate::selectors::{CompiledSelectors, PageSelectors};
use crate::types::{ChatTurn, ExtractionError, MarkdownResponse, RenderedTurn, SelectorError};

/// Converts one turn and applies the per-turn repairs: dangling fences are
/// closed, then headings are pushed below the document's own levels.
pub fn render_turn(converter: &dyn Converter, turn: &ChatTurn<'_>) -> RenderedTurn {
    let markdown = converter.to_markdown(turn.content);
    let markdown = repair_backticks(&markdown);
    RenderedTurn {
        speaker: turn.speaker,
        markdown: downgrade_headers(&markdown),
    }
}

/// Page in, Markdown document out.
pub struct MarkdownExporter {
    selectors: CompiledSelectors,
    extractor: Box<dyn Extractor>,
    converter: Box<dyn Converter>,
}

impl MarkdownExporter {
    pub fn new(selectors: &PageSelectors) -> Result<Self, SelectorError> {
        let compiled = selectors.compile()?;
        Ok(Self::with_parts(
            compiled.clone(),
            Box::new(ShareTurnExtractor::new(compiled)),
            Box::new(TranscriptConverter),
        ))
    }

    pub fn with_parts(
        selectors: CompiledSelectors,
        extractor: Box<dyn Extractor>,
        converter: Box<dyn Converter>,
    ) -> Self {
        Self {
            selectors,
            extractor,
            converter,
        }
    }

    pub fn render_turns(&self, page: &PageSnapshot) -> Vec<RenderedTurn> {
        self.extractor
            .extract(page)
            .iter()
            .map(|turn| render_turn(self.converter.as_ref(), turn))
            .collect()
    }

    pub fn export(&self, page: &PageSnapshot) -> Result<String, ExtractionError> {
        let turns = self.render_turns(page);
        if turns.is_empty() {
            transcript_warn!("no chat turns found at {}", page.source_url());
            return Err(ExtractionError::NoTurns);
        }
        if turns.iter().all(|turn| turn.markdown.trim().is_empty()) {
            transcript_warn!("all {} turns rendered empty", turns.len());
            return Err(ExtractionError::EmptyOutput);
        }

        let metadata = page.metadata(&self.selectors);
        transcript_info!(
            "exported {} turns titled {:?} from {}",
            turns.len(),
            metadata.title,
            metadata.source_url
        );
        Ok(build_markdown_document(&metadata, &turns))
    }

    /// Request form of [`Self::export`]: failure is an absent `markdown_content`.
    pub fn handle_request(&self, page: &PageSnapshot) -> MarkdownResponse {
        MarkdownResponse {
            markdown_content: self.export(page).ok(),
        }
    }
}
