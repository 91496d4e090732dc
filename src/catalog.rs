//! Heading catalog (table of contents) of the document body.

use serde::Serialize;

use crate::layout::Layout;
use crate::model::Document;

/// A heading with the headings nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Heading id shared by the heading's elements
    pub id: String,
    /// Heading text without line breaks
    pub name: String,
    /// Heading level (1-6)
    pub level: u8,
    /// Page the heading starts on (1-indexed)
    pub page_no: u32,
    /// Deeper headings that follow this one
    pub sub_catalog: Vec<CatalogEntry>,
}

/// Extract the heading tree of `doc`.
///
/// Consecutive body elements with the same title id form one heading. A
/// heading nests under the closest preceding heading of a shallower level.
pub fn build_catalog(doc: &Document, layout: &Layout) -> Vec<CatalogEntry> {
    let mut catalog = Vec::new();
    let mut elements = doc.main.iter().enumerate().peekable();

    while let Some((start, element)) = elements.next() {
        let Some(title) = &element.title else {
            continue;
        };
        let mut name: String = element.display_text();
        while let Some((_, next)) = elements.peek() {
            match &next.title {
                Some(t) if t.id == title.id => {
                    name.push_str(&next.display_text());
                    elements.next();
                }
                _ => break,
            }
        }
        let name = name.replace('\n', "");
        if name.trim().is_empty() {
            continue;
        }
        let entry = CatalogEntry {
            id: title.id.clone(),
            name,
            level: title.level,
            page_no: layout.page_of(start).unwrap_or(1),
            sub_catalog: Vec::new(),
        };
        nest(&mut catalog, entry);
    }
    catalog
}

fn nest(entries: &mut Vec<CatalogEntry>, entry: CatalogEntry) {
    if let Some(last) = entries.last_mut() {
        if entry.level > last.level {
            nest(&mut last.sub_catalog, entry);
            return;
        }
    }
    entries.push(entry);
}
