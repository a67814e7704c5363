use transcript_logging::transcript_debug;

use crate::page::PageSnapshot;
use crate::selectors::CompiledSelectors;
use crate::types::{ChatTurn, Speaker};

pub trait Extractor: Send + Sync {
    /// Turns in document order. Missing pieces shorten the result; they are
    /// never an error.
    fn extract<'a>(&self, page: &'a PageSnapshot) -> Vec<ChatTurn<'a>>;
}

/// Extractor for the shared-conversation page:
/// - every turn container, in document order
/// - user content: rich query content, else plain query text
/// - response: immersive artifact content, else the markdown response panel.
#[derive(Debug, Clone)]
pub struct ShareTurnExtractor {
    selectors: CompiledSelectors,
}

impl ShareTurnExtractor {
    pub fn new(selectors: CompiledSelectors) -> Self {
        Self { selectors }
    }
}

impl Extractor for ShareTurnExtractor {
    fn extract<'a>(&self, page: &'a PageSnapshot) -> Vec<ChatTurn<'a>> {
        let sel = &self.selectors;
        let mut turns = Vec::new();

        for (index, container) in page.document().select(&sel.turn_container).enumerate() {
            let user = container
                .select(&sel.user_query)
                .next()
                .and_then(|query| sel.user_content.first_match(query));
            match user {
                Some(content) => turns.push(ChatTurn {
                    speaker: Speaker::User,
                    content,
                }),
                None => transcript_debug!("turn {index}: no user content"),
            }

            let response = container
                .select(&sel.response_container)
                .next()
                .and_then(|panel| sel.response_content.first_match(panel));
            match response {
                Some(content) => turns.push(ChatTurn {
                    speaker: Speaker::Assistant,
                    content,
                }),
                None => transcript_debug!("turn {index}: no response content"),
            }
        }

        turns
    }
}
