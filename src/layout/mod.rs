//! Layout: rows and pages derived from a document.
//!
//! Layout output is never stored with the document. It is recomputed from
//! scratch after every committed edit and is a pure function of the
//! document and the [`LayoutConfig`].

mod engine;
mod measure;

pub use engine::LayoutEngine;
pub use measure::{
    char_width, is_spaceless_script_char, is_word_char, Measurer, Metrics, LINE_HEIGHT_RATIO,
};

use serde::Serialize;

use crate::model::RowFlex;
use crate::options::{EditorOptions, Margins, PageMode};

/// Geometry inputs of the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Page width after applying the paper direction
    pub page_width: f32,
    /// Page height after applying the paper direction
    pub page_height: f32,
    /// Page margins
    pub margins: Margins,
    /// Paginated or continuous layout
    pub page_mode: PageMode,
    /// Font size used when an element does not set one
    pub default_size: u16,
    /// Line spacing multiplier
    pub row_margin: f32,
    /// Distance from the paper top to the header
    pub header_top: f32,
    /// Distance from the paper bottom to the footer
    pub footer_bottom: f32,
    /// Side length of a checkbox
    pub checkbox_size: f32,
}

impl LayoutConfig {
    /// Width available to rows.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }
}

impl From<&EditorOptions> for LayoutConfig {
    fn from(options: &EditorOptions) -> Self {
        let (page_width, page_height) = options.oriented_size();
        Self {
            page_width,
            page_height,
            margins: options.margins,
            page_mode: options.page_mode,
            default_size: options.default_size,
            row_margin: options.row_margin,
            header_top: options.header_top,
            footer_bottom: options.footer_bottom,
            checkbox_size: options.checkbox_size,
        }
    }
}

/// A placed element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowItem {
    /// Index of the element in its zone
    pub index: usize,
    /// Left edge, in page coordinates
    pub x: f32,
    /// Advance
    pub width: f32,
    /// Height
    pub height: f32,
}

/// A laid-out line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Elements in order
    pub items: Vec<RowItem>,
    /// Top edge, in page coordinates
    pub y: f32,
    /// Sum of item advances
    pub width: f32,
    /// Tallest item
    pub height: f32,
    /// Alignment applied to the row
    pub row_flex: RowFlex,
    /// Whether the row ends with an explicit page break
    pub page_break: bool,
}

impl Row {
    /// Index of the first element on the row.
    pub fn start_index(&self) -> Option<usize> {
        self.items.first().map(|item| item.index)
    }

    /// Index one past the last element on the row.
    pub fn end_index(&self) -> Option<usize> {
        self.items.last().map(|item| item.index + 1)
    }

    /// Check if the row holds `index`.
    pub fn contains(&self, index: usize) -> bool {
        match (self.start_index(), self.end_index()) {
            (Some(start), Some(end)) => (start..end).contains(&index),
            _ => false,
        }
    }
}

/// A laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Header rows, identical on every page
    pub header: Vec<Row>,
    /// Body rows
    pub rows: Vec<Row>,
    /// Footer rows, identical on every page
    pub footer: Vec<Row>,
}

impl Page {
    /// Check if the page holds no body rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Result of laying out a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Pages in order; never empty
    pub pages: Vec<Page>,
    /// Mode the pages were produced in
    pub page_mode: PageMode,
}

impl Layout {
    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Total number of body rows.
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }

    /// Element indices of all body rows, in order.
    ///
    /// For any document this equals `0..document.main.len()`.
    pub fn main_indices(&self) -> Vec<usize> {
        self.pages
            .iter()
            .flat_map(|p| &p.rows)
            .flat_map(|r| &r.items)
            .map(|item| item.index)
            .collect()
    }

    /// Page number holding body element `index`.
    pub fn page_of(&self, index: usize) -> Option<u32> {
        self.pages
            .iter()
            .find(|p| p.rows.iter().any(|r| r.contains(index)))
            .map(|p| p.number)
    }
}
