use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

use crate::types::SelectorError;

/// CSS selectors describing the share page's DOM shape.
///
/// Slots with a `Vec` are candidate chains: the first selector that matches
/// wins, and an exhausted chain means the slot is absent on this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSelectors {
    pub turn_container: String,
    pub user_query: String,
    pub user_content: Vec<String>,
    pub response_container: String,
    pub response_content: Vec<String>,
    pub title_heading: String,
    pub publish_time: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            turn_container: "share-turn-viewer".to_string(),
            user_query: "user-query".to_string(),
            // Rich content carries uploaded files; plain text is the fallback.
            user_content: vec!["user-query-content".to_string(), ".query-text".to_string()],
            response_container: "response-container".to_string(),
            response_content: vec![
                r#"message-content[data-test-id="immersive-artifact-content"]"#.to_string(),
                ".markdown.markdown-main-panel".to_string(),
            ],
            title_heading: "h1".to_string(),
            publish_time: ".publish-time-text".to_string(),
        }
    }
}

impl PageSelectors {
    pub fn compile(&self) -> Result<CompiledSelectors, SelectorError> {
        Ok(CompiledSelectors {
            turn_container: parse("turn_container", &self.turn_container)?,
            user_query: parse("user_query", &self.user_query)?,
            user_content: CandidateChain::parse("user_content", &self.user_content)?,
            response_container: parse("response_container", &self.response_container)?,
            response_content: CandidateChain::parse("response_content", &self.response_content)?,
            title_heading: parse("title_heading", &self.title_heading)?,
            publish_time: parse("publish_time", &self.publish_time)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub turn_container: Selector,
    pub user_query: Selector,
    pub user_content: CandidateChain,
    pub response_container: Selector,
    pub response_content: CandidateChain,
    pub title_heading: Selector,
    pub publish_time: Selector,
}

/// Ordered selectors evaluated in priority order within a scope element.
#[derive(Debug, Clone)]
pub struct CandidateChain {
    candidates: Vec<Selector>,
}

impl CandidateChain {
    fn parse(slot: &'static str, raw: &[String]) -> Result<Self, SelectorError> {
        let candidates = raw
            .iter()
            .map(|sel| parse(slot, sel))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { candidates })
    }

    /// First descendant of `scope` matched by the highest-priority candidate
    /// that matches anything; `None` once every candidate has been tried.
    pub fn first_match<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.candidates
            .iter()
            .find_map(|sel| scope.select(sel).next())
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn parse(slot: &'static str, selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|err| SelectorError {
        slot,
        selector: selector.to_string(),
        message: err.to_string(),
    })
}
