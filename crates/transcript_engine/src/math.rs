//! Recovery of LaTeX source from rendered math elements.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use crate::dom::class_contains;

static MATH_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".math-tex").expect("valid math selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MathNode {
    pub source: String,
    pub block: bool,
}

impl MathNode {
    /// `None` when the element is not math, or is math whose source cannot be
    /// recovered; the caller then converts it like any other element.
    pub(crate) fn detect(element: ElementRef) -> Option<Self> {
        if !is_math(element) {
            return None;
        }
        let source = formula_source(element)?;
        Some(Self {
            source,
            block: is_block(element),
        })
    }

    pub(crate) fn render(&self, indent: &str) -> String {
        if self.block {
            format!(
                "\n{indent}$$\n{indent}{source}\n{indent}$$\n",
                source = self.source
            )
        } else {
            format!("${}$", self.source)
        }
    }
}

fn is_math(element: ElementRef) -> bool {
    let value = element.value();
    class_contains(value, "math")
        || value.name() == "mjx-container"
        || value.attr("data-math").is_some()
        || element.select(&MATH_TEXT).next().is_some()
}

fn is_block(element: ElementRef) -> bool {
    let value = element.value();
    value.name() == "div"
        || class_contains(value, "math-block")
        || value.attr("display") == Some("block")
}

fn formula_source(element: ElementRef) -> Option<String> {
    let value = element.value();
    let candidates = [
        value.attr("data-math").map(str::to_string),
        element
            .select(&MATH_TEXT)
            .next()
            .map(|node| node.text().collect::<String>()),
        value.attr("data-latex").map(str::to_string),
        value.attr("data-value").map(str::to_string),
        value
            .attr("aria-label")
            .and_then(|label| label.strip_prefix("LaTeX:"))
            .map(str::to_string),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(|source| source.trim().to_string())
        .find(|source| !source.is_empty())
}
