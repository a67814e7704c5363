//! Read-only helpers over scraper elements shared by the renderer passes.

use ego_tree::NodeRef;
use scraper::node::{Element, Node};
use scraper::ElementRef;

const VISUALLY_HIDDEN_CLASS: &str = "cdk-visually-hidden";
/// Anchors wrapping the image-search icon next to uploaded images.
const LENS_LINK_CLASS: &str = "lens-icon-container";

/// Elements never rendered: page chrome and non-content markup.
const DROPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "button"];

/// True for accessibility-only, `display:none`, `visibility:hidden` or
/// `aria-hidden="true"` elements. Their whole subtree is excluded from output.
pub(crate) fn is_hidden(element: &Element) -> bool {
    if class_contains(element, VISUALLY_HIDDEN_CLASS) {
        return true;
    }
    if element.attr("aria-hidden") == Some("true") {
        return true;
    }
    if let Some(style) = element.attr("style") {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if compact.contains("display:none") || compact.contains("visibility:hidden") {
            return true;
        }
    }
    false
}

pub(crate) fn is_dropped(element: &Element) -> bool {
    DROPPED_TAGS.contains(&element.name())
}

/// Image-search anchors render as nothing, children included.
pub(crate) fn is_lens_link(element: &Element) -> bool {
    element.name() == "a" && class_contains(element, LENS_LINK_CLASS)
}

/// Substring match against the raw `class` attribute.
pub(crate) fn class_contains(element: &Element, needle: &str) -> bool {
    element
        .attr("class")
        .is_some_and(|class| class.contains(needle))
}

/// Text as a reader sees it: text nodes in order, `<br>` as a newline,
/// hidden and dropped subtrees skipped. No escaping is applied.
pub(crate) fn rendered_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_rendered(*element, &mut out);
    out
}

fn collect_rendered(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                if is_hidden(element) || is_dropped(element) {
                    continue;
                }
                if element.name() == "br" {
                    out.push('\n');
                } else {
                    collect_rendered(child, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn hidden_markers_are_recognized() {
        let doc = Html::parse_fragment(
            r#"<span class="a cdk-visually-hidden">x</span>
               <span style="display: none">x</span>
               <span style="VISIBILITY:hidden;color:red">x</span>
               <span aria-hidden="true">x</span>
               <span aria-hidden="false" style="display:block">x</span>"#,
        );
        let sel = Selector::parse("span").unwrap();
        let flags: Vec<bool> = doc.select(&sel).map(|el| is_hidden(el.value())).collect();
        assert_eq!(flags, vec![true, true, true, true, false]);
    }

    #[test]
    fn rendered_text_keeps_line_breaks_and_skips_hidden() {
        let doc = Html::parse_fragment(
            r#"<pre>let a = 1;<br>let b = <span aria-hidden="true">secret</span>2;</pre>"#,
        );
        assert_eq!(rendered_text(first(&doc, "pre")), "let a = 1;\nlet b = 2;");
    }
}
