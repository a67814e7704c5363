use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use transcript_logging::transcript_trace;

use crate::code::CodeShield;
use crate::dom::{is_dropped, is_hidden, is_lens_link};
use crate::math::MathNode;
use crate::table::render_table;

/// Only images tagged with this test id are user uploads.
const UPLOADED_IMAGE_MARKER: &str = "uploaded-img";
/// Extra indentation per nested list level.
const LIST_INDENT: &str = "  ";

pub trait Converter: Send + Sync {
    /// Convert the children of `root` to Markdown.
    fn to_markdown(&self, root: ElementRef) -> String;
}

/// Tree-walking converter for chat turn content.
#[derive(Debug, Default, Clone, Copy)]
pub struct TranscriptConverter;

impl TranscriptConverter {
    /// Parse `html` as a fragment and convert it.
    pub fn convert_fragment(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        self.to_markdown(fragment.root_element())
    }
}

impl Converter for TranscriptConverter {
    fn to_markdown(&self, root: ElementRef) -> String {
        let shield = CodeShield::collect(root);
        transcript_trace!("lifted {} code spans", shield.records().len());

        let walker = Walker { shield: &shield };
        let mut out = String::new();
        walker.visit_children(*root, "", &mut out);

        shield.restore(&out).trim().to_string()
    }
}

struct Walker<'s> {
    shield: &'s CodeShield,
}

impl Walker<'_> {
    fn visit_children(&self, node: NodeRef<'_, Node>, indent: &str, out: &mut String) {
        for child in node.children() {
            self.visit_node(child, indent, out);
        }
    }

    fn visit_node(&self, node: NodeRef<'_, Node>, indent: &str, out: &mut String) {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(node) {
                    self.visit_element(element, indent, out);
                }
            }
            _ => {}
        }
    }

    fn visit_element(&self, element: ElementRef, indent: &str, out: &mut String) {
        if let Some(token) = self.shield.token_for(element.id()) {
            out.push_str(&token);
            return;
        }
        let value = element.value();
        if is_hidden(value) || is_dropped(value) {
            return;
        }
        if let Some(math) = MathNode::detect(element) {
            out.push_str(&math.render(indent));
            return;
        }

        let tag = value.name().to_ascii_lowercase();
        if let Some(level) = heading_level(&tag) {
            let text = self.text_content(element);
            out.push_str(&format!("\n{} {}\n", "#".repeat(level), text.trim()));
            return;
        }

        match tag.as_str() {
            "p" => {
                out.push('\n');
                self.visit_children(*element, indent, out);
                out.push('\n');
            }
            "br" => out.push('\n'),
            "hr" => out.push_str("\n---\n"),
            "strong" | "b" => out.push_str(&wrap_inline(&self.text_content(element), "**", "**")),
            "em" | "i" => out.push_str(&wrap_inline(&self.text_content(element), "*", "*")),
            "sub" => out.push_str(&wrap_inline(&self.text_content(element), "<sub>", "</sub>")),
            "sup" => out.push_str(&wrap_inline(&self.text_content(element), "<sup>", "</sup>")),
            "ul" => {
                out.push('\n');
                self.visit_list(element, false, indent, out);
            }
            "ol" => {
                out.push('\n');
                self.visit_list(element, true, indent, out);
            }
            "a" => self.handle_anchor(element, out),
            "img" => handle_image(element, out),
            "table" => out.push_str(&render_table(element, |cell| self.text_content(cell))),
            "blockquote" => {
                let text = self.text_content(element);
                let text = text.trim();
                if !text.is_empty() {
                    let quoted: Vec<String> =
                        text.split('\n').map(|line| format!("> {line}")).collect();
                    out.push('\n');
                    out.push_str(&quoted.join("\n"));
                    out.push('\n');
                }
            }
            _ => self.visit_children(*element, indent, out),
        }
    }

    /// One line per visible `<li>`. Hidden items are filtered before numbering,
    /// so they never consume an ordinal.
    fn visit_list(&self, list: ElementRef, ordered: bool, indent: &str, out: &mut String) {
        let items = list
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|item| item.value().name() == "li" && !is_hidden(item.value()));

        let nested_indent = format!("{indent}{LIST_INDENT}");
        for (index, item) in items.enumerate() {
            let prefix = if ordered {
                format!("{}. ", index + 1)
            } else {
                "- ".to_string()
            };

            let mut content = String::new();
            for child in item.children() {
                match child.value() {
                    Node::Text(text) => {
                        if content.trim().is_empty() {
                            content.clear();
                            content.push_str(text.trim_start());
                        } else {
                            content.push_str(text);
                        }
                    }
                    Node::Element(value) => {
                        let Some(element) = ElementRef::wrap(child) else {
                            continue;
                        };
                        let nested_ordered = match value.name() {
                            "ul" => Some(false),
                            "ol" => Some(true),
                            _ => None,
                        };
                        match nested_ordered {
                            Some(nested_ordered) if !is_hidden(value) => {
                                if !content.ends_with('\n') && !content.trim().is_empty() {
                                    content.push('\n');
                                }
                                self.visit_list(element, nested_ordered, &nested_indent, &mut content);
                            }
                            _ => self.visit_element(element, &nested_indent, &mut content),
                        }
                    }
                    _ => {}
                }
            }

            let content = content.trim_start_matches('\n').trim_end();
            out.push_str(&format!("{indent}{prefix}{content}\n"));
        }
    }

    fn handle_anchor(&self, element: ElementRef, out: &mut String) {
        if is_lens_link(element.value()) {
            return;
        }
        let text = self.text_content(element);
        match element.value().attr("href").map(str::trim) {
            Some(href) if !href.is_empty() => out.push_str(&format!("[{}]({href})", text.trim())),
            _ => out.push_str(&text),
        }
    }

    /// Text content with code placeholders kept and hidden subtrees skipped.
    fn text_content(&self, element: ElementRef) -> String {
        let mut out = String::new();
        self.collect_text(*element, &mut out);
        out
    }

    fn collect_text(&self, node: NodeRef<'_, Node>, out: &mut String) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(value) => {
                    if let Some(token) = self.shield.token_for(child.id()) {
                        out.push_str(&token);
                    } else if !is_hidden(value) && !is_dropped(value) {
                        self.collect_text(child, out);
                    }
                }
                _ => {}
            }
        }
    }
}

fn handle_image(element: ElementRef, out: &mut String) {
    let value = element.value();
    let uploaded = value
        .attr("data-test-id")
        .is_some_and(|id| id.contains(UPLOADED_IMAGE_MARKER));
    if !uploaded {
        return;
    }
    if let Some(src) = value.attr("src").map(str::trim).filter(|src| !src.is_empty()) {
        let alt = value.attr("alt").unwrap_or("");
        out.push_str(&format!("![{alt}]({src})"));
    }
}

fn heading_level(tag: &str) -> Option<usize> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Wrap the trimmed text in markers, keeping surrounding whitespace outside
/// them. Empty text produces nothing.
fn wrap_inline(text: &str, open: &str, close: &str) -> String {
    let inner = text.trim();
    if inner.is_empty() {
        return String::new();
    }
    let leading = if text.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if text.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{leading}{open}{inner}{close}{trailing}")
}
