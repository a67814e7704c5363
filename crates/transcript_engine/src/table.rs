use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use crate::dom::is_hidden;

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid row selector"));

/// Flatten a table into a pipe table. Cells are plain text (via `cell_text`);
/// the separator row follows the first row and has one column per cell in it.
pub(crate) fn render_table<F>(table: ElementRef, cell_text: F) -> String
where
    F: Fn(ElementRef) -> String,
{
    let rows: Vec<Vec<String>> = table
        .select(&ROW)
        .filter(|row| !is_hidden(row.value()))
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .filter(|cell| !is_hidden(cell.value()))
                .map(|cell| cell_text(cell).trim().to_string())
                .collect()
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n");
    for (index, cells) in rows.iter().enumerate() {
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
        if index == 0 {
            let separator = vec!["---"; cells.len()].join(" | ");
            out.push_str(&format!("| {separator} |\n"));
        }
    }
    out.push('\n');
    out
}
