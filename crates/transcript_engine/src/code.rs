//! Code-block extraction pass.
//!
//! `<pre>` and `<code>` subtrees are lifted out before the structural walk and
//! stood in for by placeholder tokens, so their text reaches the output
//! byte-for-byte. The source tree is never touched: the shield is an overlay
//! keyed by node id that the walker consults.

use std::collections::HashMap;

use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::node::Node;
use scraper::ElementRef;

use crate::dom::{is_dropped, is_hidden, is_lens_link, rendered_text};
use crate::math::MathNode;
use crate::types::CodeBlockRecord;

// Private Use Area delimiters never occur in page prose.
const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E000}CODE_BLOCK_([0-9]+)\u{E001}").expect("valid token regex"));

pub fn placeholder(index: usize) -> String {
    format!("{TOKEN_OPEN}CODE_BLOCK_{index}{TOKEN_CLOSE}")
}

#[derive(Debug, Default)]
pub struct CodeShield {
    by_node: HashMap<NodeId, usize>,
    records: Vec<CodeBlockRecord>,
}

impl CodeShield {
    /// Walk `root` in document order and record every code span. A `<pre>` is
    /// recorded as one fenced block and its inner `<code>` is not visited again.
    pub fn collect(root: ElementRef) -> Self {
        let mut shield = Self::default();
        shield.visit(*root);
        shield
    }

    fn visit(&mut self, node: NodeRef<'_, Node>) {
        for child in node.children() {
            let Some(element) = ElementRef::wrap(child) else {
                continue;
            };
            let value = element.value();
            // Subtrees the walker replaces wholesale must not leave records behind.
            if is_hidden(value) || is_dropped(value) || is_lens_link(value) {
                continue;
            }
            if MathNode::detect(element).is_some() {
                continue;
            }
            match value.name() {
                "pre" => self.push(child.id(), fenced(element)),
                "code" => self.push(child.id(), format!("`{}`", rendered_text(element))),
                _ => self.visit(child),
            }
        }
    }

    fn push(&mut self, id: NodeId, markdown: String) {
        let index = self.records.len();
        self.by_node.insert(id, index);
        self.records.push(CodeBlockRecord { index, markdown });
    }

    /// Placeholder standing in for `node`, if it was lifted out.
    pub fn token_for(&self, node: NodeId) -> Option<String> {
        self.by_node.get(&node).map(|&index| placeholder(index))
    }

    pub fn records(&self) -> &[CodeBlockRecord] {
        &self.records
    }

    /// Swap every placeholder in `markdown` for its record in one pass, so
    /// restored code text is never rescanned for tokens.
    pub fn restore(&self, markdown: &str) -> String {
        if self.records.is_empty() {
            return markdown.to_string();
        }
        TOKEN_RE
            .replace_all(markdown, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.records.get(index))
                    .map(|record| record.markdown.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn fenced(pre: ElementRef) -> String {
    let code_sel = code_selector();
    let mut codes = pre.select(code_sel);
    let text = match (codes.next(), codes.next()) {
        (Some(only), None) => rendered_text(only),
        _ => rendered_text(pre),
    };
    let text = text.strip_suffix('\n').unwrap_or(&text);
    format!("\n```\n{text}\n```\n")
}

fn code_selector() -> &'static scraper::Selector {
    static CODE: Lazy<scraper::Selector> =
        Lazy::new(|| scraper::Selector::parse("code").expect("valid code selector"));
    &CODE
}
