//! Row breaking and pagination.

use super::measure::{is_word_char, Measurer};
use super::{Layout, LayoutConfig, Page, Row, RowItem};
use crate::model::{Document, Element, ElementKind, RowFlex};
use crate::options::PageMode;

/// Lays out documents against one configuration.
///
/// # Example
///
/// ```
/// use richdoc::layout::{LayoutConfig, LayoutEngine};
/// use richdoc::model::{Document, Element};
/// use richdoc::EditorOptions;
///
/// let doc = Document::with_main(vec![Element::text("hello world")]);
/// let engine = LayoutEngine::new(LayoutConfig::from(&EditorOptions::default()));
/// let layout = engine.layout(&doc);
/// assert_eq!(layout.page_count(), 1);
/// assert_eq!(layout.main_indices(), (0..doc.main.len()).collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a document. Never fails and always yields at least one page.
    pub fn layout(&self, doc: &Document) -> Layout {
        let content_width = self.config.content_width();
        let header = self.break_rows(doc.header.as_slice(), content_width);
        let footer = self.break_rows(doc.footer.as_slice(), content_width);
        let main = self.break_rows(doc.main.as_slice(), content_width);

        let header_height: f32 = header.iter().map(|r| r.height).sum();
        let footer_height: f32 = footer.iter().map(|r| r.height).sum();
        let main_top = self
            .config
            .margins
            .top
            .max(self.config.header_top + header_height);
        let main_bottom = self
            .config
            .margins
            .bottom
            .max(self.config.footer_bottom + footer_height);

        let mut pages = match self.config.page_mode {
            PageMode::Paging => self.paginate(main, main_top, main_bottom),
            PageMode::Continuity => vec![self.continuous_page(main, main_top, main_bottom)],
        };

        for page in &mut pages {
            page.header = place_rows(&header, self.config.header_top);
            let footer_top = page.height - self.config.footer_bottom - footer_height;
            page.footer = place_rows(&footer, footer_top);
        }

        log::debug!(
            "Laid out {} elements into {} rows on {} pages",
            doc.main.len(),
            pages.iter().map(|p| p.rows.len()).sum::<usize>(),
            pages.len()
        );

        Layout {
            pages,
            page_mode: self.config.page_mode,
        }
    }

    /// Break a zone into rows. Rows carry x positions; y is left at zero.
    fn break_rows(&self, elements: &[Element], content_width: f32) -> Vec<Row> {
        let measurer = Measurer::new(&self.config);
        let mut builder = RowBuilder::new(self.config.margins.left, content_width);

        for (index, element) in elements.iter().enumerate() {
            let metrics = measurer.measure(element);
            let item = RowItem {
                index,
                x: 0.0,
                width: metrics.width,
                height: metrics.height,
            };

            match element.kind {
                ElementKind::Separator => {
                    builder.finish(elements, true);
                    builder.push(item, false);
                    builder.finish(elements, true);
                    continue;
                }
                ElementKind::PageBreak => {
                    builder.finish(elements, true);
                    builder.push(item, false);
                    builder.page_break = true;
                    builder.finish(elements, true);
                    continue;
                }
                _ => {}
            }

            if element.is_newline() {
                builder.finish(elements, true);
                builder.push(item, false);
                continue;
            }

            let word_char = is_word_char(element);
            if builder.width + item.width > content_width && !builder.items.is_empty() {
                match builder.word_start {
                    Some(start) if word_char && builder.has_width_before(start) => {
                        builder.wrap_word(elements, start);
                        if builder.width + item.width > content_width {
                            builder.finish(elements, false);
                        }
                    }
                    _ => builder.finish(elements, false),
                }
            }
            if builder.items.is_empty() && item.width > content_width {
                log::warn!(
                    "Element {} ({}) is {:.1}px wide, wider than the {:.1}px content area; placing it alone",
                    index,
                    element.kind_name(),
                    item.width,
                    content_width
                );
            }
            builder.push(item, word_char);
        }
        builder.finish(elements, true);
        builder.rows
    }

    fn paginate(&self, rows: Vec<Row>, main_top: f32, main_bottom: f32) -> Vec<Page> {
        let limit = self.config.page_height - main_bottom;
        let mut pages = vec![self.new_page(1)];
        let mut cursor = main_top;
        let mut break_pending = false;

        for mut row in rows {
            let needs_page = match pages.last() {
                Some(page) => {
                    !page.rows.is_empty() && (break_pending || cursor + row.height > limit)
                }
                None => true,
            };
            if needs_page {
                let number = pages.len() as u32 + 1;
                pages.push(self.new_page(number));
                cursor = main_top;
            }
            if cursor + row.height > limit {
                log::warn!(
                    "Row of height {:.1}px exceeds the page body; placing it on page {}",
                    row.height,
                    pages.len()
                );
            }
            row.y = cursor;
            cursor += row.height;
            break_pending = row.page_break;
            if let Some(page) = pages.last_mut() {
                page.rows.push(row);
            }
        }
        pages
    }

    fn continuous_page(&self, rows: Vec<Row>, main_top: f32, main_bottom: f32) -> Page {
        let content_height: f32 = rows.iter().map(|r| r.height).sum();
        let mut page = self.new_page(1);
        page.height = page.height.max(main_top + content_height + main_bottom);
        page.rows = place_rows(&rows, main_top);
        page
    }

    fn new_page(&self, number: u32) -> Page {
        Page {
            number,
            width: self.config.page_width,
            height: self.config.page_height,
            header: Vec::new(),
            rows: Vec::new(),
            footer: Vec::new(),
        }
    }
}

/// Stack rows vertically starting at `top`.
fn place_rows(rows: &[Row], top: f32) -> Vec<Row> {
    let mut cursor = top;
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            row.y = cursor;
            cursor += row.height;
            row
        })
        .collect()
}

/// Accumulates items into the current row.
struct RowBuilder {
    left: f32,
    content_width: f32,
    items: Vec<RowItem>,
    width: f32,
    /// Position in `items` where the current unbreakable word starts
    word_start: Option<usize>,
    page_break: bool,
    rows: Vec<Row>,
}

impl RowBuilder {
    fn new(left: f32, content_width: f32) -> Self {
        Self {
            left,
            content_width,
            items: Vec::new(),
            width: 0.0,
            word_start: None,
            page_break: false,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, item: RowItem, word_char: bool) {
        if word_char {
            if self.word_start.is_none() {
                self.word_start = Some(self.items.len());
            }
        } else {
            self.word_start = None;
        }
        self.width += item.width;
        self.items.push(item);
    }

    fn has_width_before(&self, position: usize) -> bool {
        self.items[..position].iter().any(|item| item.width > 0.0)
    }

    /// Move the trailing word onto a fresh row.
    fn wrap_word(&mut self, elements: &[Element], start: usize) {
        let word = self.items.split_off(start);
        self.width = self.items.iter().map(|item| item.width).sum();
        self.finish(elements, false);
        for item in word {
            self.push(item, true);
        }
    }

    /// Close the current row. `paragraph_end` is false for soft wraps.
    fn finish(&mut self, elements: &[Element], paragraph_end: bool) {
        if self.items.is_empty() {
            return;
        }
        let mut items = std::mem::take(&mut self.items);
        let width = self.width;
        let height = items.iter().map(|item| item.height).fold(0.0, f32::max);
        let row_flex = items
            .first()
            .and_then(|item| elements.get(item.index))
            .and_then(|element| element.row_flex)
            .unwrap_or_default();

        let slack = (self.content_width - width).max(0.0);
        let (mut offset, gap) = match row_flex {
            RowFlex::Left => (0.0, 0.0),
            RowFlex::Center => (slack / 2.0, 0.0),
            RowFlex::Right => (slack, 0.0),
            RowFlex::Justify if !paragraph_end && items.len() > 1 => {
                (0.0, slack / (items.len() - 1) as f32)
            }
            RowFlex::Justify => (0.0, 0.0),
        };
        for item in &mut items {
            item.x = self.left + offset;
            offset += item.width + gap;
        }

        self.rows.push(Row {
            items,
            y: 0.0,
            width,
            height,
            row_flex,
            page_break: self.page_break,
        });
        self.width = 0.0;
        self.word_start = None;
        self.page_break = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;
    use crate::options::{EditorOptions, Margins};

    /// 100px content width, 8px per latin char at size 16, rows 20px tall.
    fn narrow_engine() -> LayoutEngine {
        let options = EditorOptions::new()
            .with_paper_size(140.0, 200.0)
            .with_margins(Margins::new(20.0, 20.0, 20.0, 20.0));
        LayoutEngine::new(LayoutConfig::from(&options))
    }

    fn row_texts(doc: &Document, layout: &Layout) -> Vec<String> {
        layout
            .pages
            .iter()
            .flat_map(|p| &p.rows)
            .map(|r| {
                r.items
                    .iter()
                    .map(|i| doc.main.element(i.index).map(|e| e.value.as_str()).unwrap_or(""))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let layout = narrow_engine().layout(&Document::new());
        assert_eq!(layout.page_count(), 1);
        assert!(layout.pages[0].is_empty());
    }

    #[test]
    fn test_word_wrap_moves_whole_word() {
        // "aaaaaaaaa bbbb" : 9 a's (72px) + space (80px) + "bbbb" does not fit
        let doc = Document::with_main(vec![Element::text("aaaaaaaaa bbbb")]);
        let layout = narrow_engine().layout(&doc);
        assert_eq!(row_texts(&doc, &layout), vec!["aaaaaaaaa ", "bbbb"]);
    }

    #[test]
    fn test_long_word_breaks_by_char() {
        let doc = Document::with_main(vec![Element::text("abcdefghijklmno")]);
        let layout = narrow_engine().layout(&doc);
        assert_eq!(row_texts(&doc, &layout), vec!["abcdefghijkl", "mno"]);
    }

    #[test]
    fn test_wrapped_word_still_too_wide_breaks_by_char() {
        // A 1px space, then 14 chars of 8px: the word moves down and still overflows.
        let mut main = vec![Element::text(" ").with_size(2)];
        main.push(Element::text("b".repeat(14)));
        let doc = Document::with_main(main);
        let layout = narrow_engine().layout(&doc);

        let rows = &layout.pages[0].rows;
        let counts: Vec<_> = rows.iter().map(|r| r.items.len()).collect();
        assert_eq!(counts, vec![1, 12, 2]);
        assert!(rows.iter().all(|r| r.width <= 100.0));
        assert_eq!(layout.main_indices(), (0..15).collect::<Vec<_>>());
    }

    #[test]
    fn test_newline_starts_row() {
        let doc = Document::with_main(vec![Element::text("ab\ncd")]);
        let layout = narrow_engine().layout(&doc);
        assert_eq!(row_texts(&doc, &layout), vec!["ab", "\ncd"]);
    }

    #[test]
    fn test_separator_on_own_row() {
        let doc = Document::with_main(vec![
            Element::text("ab"),
            Element::separator(),
            Element::text("cd"),
        ]);
        let layout = narrow_engine().layout(&doc);
        let rows: Vec<_> = layout.pages[0].rows.iter().map(|r| r.items.len()).collect();
        assert_eq!(rows, vec![2, 1, 2]);
    }

    #[test]
    fn test_oversized_element_placed_alone() {
        let doc = Document::with_main(vec![
            Element::text("a"),
            Element::image("img", 500.0, 30.0),
            Element::text("b"),
        ]);
        let layout = narrow_engine().layout(&doc);
        let rows = &layout.pages[0].rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].items.len(), 1);
        assert_eq!(rows[1].items[0].index, 1);
        assert_eq!(layout.main_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_pagination_splits_rows() {
        // Body height 160px holds 8 rows of 20px.
        let text = "x\n".repeat(12);
        let doc = Document::with_main(vec![Element::text(text)]);
        let layout = narrow_engine().layout(&doc);
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[0].rows.len(), 8);
        assert_eq!(layout.pages[0].rows[0].y, 20.0);
        assert_eq!(layout.pages[1].rows[0].y, 20.0);
        assert_eq!(layout.main_indices().len(), doc.main.len());
    }

    #[test]
    fn test_page_break_forces_new_page() {
        let doc = Document::with_main(vec![
            Element::text("a"),
            Element::page_break(),
            Element::text("b"),
        ]);
        let layout = narrow_engine().layout(&doc);
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.page_of(2), Some(2));
    }

    #[test]
    fn test_continuity_single_growing_page() {
        let options = EditorOptions::new()
            .with_paper_size(140.0, 200.0)
            .with_margins(Margins::new(20.0, 20.0, 20.0, 20.0))
            .continuity();
        let engine = LayoutEngine::new(LayoutConfig::from(&options));
        let doc = Document::with_main(vec![Element::text("x\n".repeat(12))]);
        let layout = engine.layout(&doc);
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.pages[0].rows.len(), 13);
        assert!(layout.pages[0].height > 200.0);
    }

    #[test]
    fn test_header_repeated_on_each_page() {
        let doc = Document::from_zones(
            vec![Element::text("H")],
            vec![Element::text("a"), Element::page_break(), Element::text("b")],
            vec![Element::text("F")],
        );
        let layout = narrow_engine().layout(&doc);
        assert_eq!(layout.page_count(), 2);
        for page in &layout.pages {
            assert_eq!(page.header.len(), 1);
            assert_eq!(page.footer.len(), 1);
            assert_eq!(page.header[0].y, 30.0);
        }
        // Header (30 + 20) pushes the body below the 20px margin.
        assert_eq!(layout.pages[0].rows[0].y, 50.0);
    }

    #[test]
    fn test_center_alignment() {
        let doc = Document::with_main(vec![Element::text("ab").with_row_flex(RowFlex::Center)]);
        let layout = narrow_engine().layout(&doc);
        let row = &layout.pages[0].rows[0];
        assert_eq!(row.row_flex, RowFlex::Center);
        assert_eq!(row.items[0].x, 20.0 + 42.0);
    }

    #[test]
    fn test_table_reserves_declared_size() {
        let table = Table::new(3, 2, 80.0, 30.0).unwrap();
        let doc = Document::with_main(vec![Element::table(table)]);
        let layout = narrow_engine().layout(&doc);
        let row = &layout.pages[0].rows[0];
        assert_eq!(row.height, 90.0);
        assert_eq!(row.width, 80.0);
    }

    #[test]
    fn test_layout_idempotent() {
        let doc = Document::with_main(vec![Element::text("some words that wrap around\nx")]);
        let engine = narrow_engine();
        assert_eq!(engine.layout(&doc), engine.layout(&doc));
    }
}
