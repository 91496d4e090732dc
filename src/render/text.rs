//! Page-oriented plain text export.

use crate::error::Result;
use crate::layout::{Layout, Row};
use crate::model::{Document, ElementKind};
use crate::store::ElementStore;

use super::RenderOptions;

/// Render the laid-out pages of a document as plain text, one line per row.
pub fn to_text(doc: &Document, layout: &Layout, options: &RenderOptions) -> Result<String> {
    let mut pages = Vec::new();
    for page in &layout.pages {
        if !options.page_selection.includes(page.number) {
            continue;
        }
        let mut lines = Vec::new();
        if options.include_header {
            lines.extend(page.header.iter().map(|r| row_text(&doc.header, r, options)));
        }
        lines.extend(page.rows.iter().map(|r| row_text(&doc.main, r, options)));
        if options.include_footer {
            lines.extend(page.footer.iter().map(|r| row_text(&doc.footer, r, options)));
        }
        pages.push(lines.join("\n"));
    }

    let output = pages.join(&options.page_separator);
    Ok(output.trim_end().to_string())
}

/// Text of one row; line and page breaks add nothing.
fn row_text(store: &ElementStore, row: &Row, options: &RenderOptions) -> String {
    row.items
        .iter()
        .filter_map(|item| store.element(item.index))
        .map(|element| match &element.kind {
            ElementKind::Separator => options.separator_line.clone(),
            ElementKind::PageBreak => String::new(),
            _ if element.is_newline() => String::new(),
            _ => element.display_text(),
        })
        .collect::<String>()
        .trim_end()
        .to_string()
}
