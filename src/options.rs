//! Editor options and configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for an editor session.
///
/// All lengths are in CSS pixels. The defaults describe an A4 sheet at 96 DPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Paper width in portrait orientation
    pub width: f32,

    /// Paper height in portrait orientation
    pub height: f32,

    /// Page margins
    pub margins: Margins,

    /// Paginated or continuous layout
    pub page_mode: PageMode,

    /// Paper orientation
    pub paper_direction: PaperDirection,

    /// Interaction mode
    pub mode: EditorMode,

    /// Font used when an element does not name one
    pub default_font: String,

    /// Font size used when an element does not set one
    pub default_size: u16,

    /// Line spacing multiplier
    pub row_margin: f32,

    /// Distance from the paper top to the header
    pub header_top: f32,

    /// Distance from the paper bottom to the footer
    pub footer_bottom: f32,

    /// Vertical gap between pages
    pub page_gap: f32,

    /// Height of a freshly inserted table row
    pub table_row_height: f32,

    /// Side length of a checkbox
    pub checkbox_size: f32,

    /// Maximum number of undo entries
    pub history_capacity: usize,

    /// Content-change debounce window in milliseconds
    pub debounce_ms: u64,

    /// Painter single-click confirmation window in milliseconds
    pub painter_timeout_ms: u64,
}

impl EditorOptions {
    /// Create new editor options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set paper dimensions (portrait orientation).
    pub fn with_paper_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set page mode.
    pub fn with_page_mode(mut self, mode: PageMode) -> Self {
        self.page_mode = mode;
        self
    }

    /// Use continuous layout.
    pub fn continuity(mut self) -> Self {
        self.page_mode = PageMode::Continuity;
        self
    }

    /// Set paper direction.
    pub fn with_paper_direction(mut self, direction: PaperDirection) -> Self {
        self.paper_direction = direction;
        self
    }

    /// Set the interaction mode.
    pub fn with_mode(mut self, mode: EditorMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the default font size.
    pub fn with_default_size(mut self, size: u16) -> Self {
        self.default_size = size;
        self
    }

    /// Set the line spacing multiplier.
    pub fn with_row_margin(mut self, row_margin: f32) -> Self {
        self.row_margin = row_margin;
        self
    }

    /// Set the undo history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the content-change debounce window.
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce_ms = window.as_millis() as u64;
        self
    }

    /// Set the painter confirmation window.
    pub fn with_painter_timeout(mut self, timeout: Duration) -> Self {
        self.painter_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Content-change debounce window.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Painter confirmation window.
    pub fn painter_timeout(&self) -> Duration {
        Duration::from_millis(self.painter_timeout_ms)
    }

    /// Paper size after applying the paper direction.
    pub fn oriented_size(&self) -> (f32, f32) {
        match self.paper_direction {
            PaperDirection::Vertical => (self.width, self.height),
            PaperDirection::Horizontal => (self.height, self.width),
        }
    }

    /// Width available to rows between the left and right margins.
    pub fn content_width(&self) -> f32 {
        let (width, _) = self.oriented_size();
        width - self.margins.left - self.margins.right
    }

    /// Parse options from a JSON string; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that the options describe a usable page.
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidOptions(format!(
                "paper size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.content_width() <= 0.0 {
            return Err(Error::InvalidOptions(
                "margins leave no horizontal space for content".to_string(),
            ));
        }
        let (_, height) = self.oriented_size();
        if height - self.margins.top - self.margins.bottom <= 0.0 {
            return Err(Error::InvalidOptions(
                "margins leave no vertical space for content".to_string(),
            ));
        }
        if self.default_size == 0 {
            return Err(Error::InvalidOptions(
                "default size must be at least 1".to_string(),
            ));
        }
        if self.row_margin <= 0.0 {
            return Err(Error::InvalidOptions(
                "row margin must be positive".to_string(),
            ));
        }
        if self.history_capacity == 0 {
            return Err(Error::InvalidOptions(
                "history capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            width: 794.0,
            height: 1123.0,
            margins: Margins::default(),
            page_mode: PageMode::Paging,
            paper_direction: PaperDirection::Vertical,
            mode: EditorMode::Edit,
            default_font: "Microsoft YaHei".to_string(),
            default_size: 16,
            row_margin: 1.0,
            header_top: 30.0,
            footer_bottom: 30.0,
            page_gap: 20.0,
            table_row_height: 42.0,
            checkbox_size: 14.0,
            history_capacity: 100,
            debounce_ms: 200,
            painter_timeout_ms: 200,
        }
    }
}

/// Page margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Right margin
    pub right: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
}

impl Margins {
    /// Create margins in CSS order (top, right, bottom, left).
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same margin on every side.
    pub fn uniform(margin: f32) -> Self {
        Self::new(margin, margin, margin, margin)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(100.0, 120.0, 100.0, 120.0)
    }
}

/// Layout mode of the document body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    /// Fixed-size pages with header and footer on each
    #[default]
    Paging,
    /// One page that grows with the content
    Continuity,
}

/// Paper orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperDirection {
    /// Portrait
    #[default]
    Vertical,
    /// Landscape
    Horizontal,
}

/// Whole-document interaction mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Normal editing
    #[default]
    Edit,
    /// Editing without auxiliary decorations
    Clean,
    /// No content changes
    Readonly,
    /// Only form fields (checkboxes, controls) may change
    Form,
    /// Print preview; behaves like readonly
    Print,
    /// Editing including structural controls
    Design,
}

impl EditorMode {
    /// All modes in cycling order.
    pub const ALL: [EditorMode; 6] = [
        EditorMode::Edit,
        EditorMode::Clean,
        EditorMode::Readonly,
        EditorMode::Form,
        EditorMode::Print,
        EditorMode::Design,
    ];

    /// Mode name as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            EditorMode::Edit => "edit",
            EditorMode::Clean => "clean",
            EditorMode::Readonly => "readonly",
            EditorMode::Form => "form",
            EditorMode::Print => "print",
            EditorMode::Design => "design",
        }
    }

    /// Next mode in [`EditorMode::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Whether content edits are blocked entirely.
    pub fn is_readonly(self) -> bool {
        matches!(self, EditorMode::Readonly | EditorMode::Print)
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_options_builder() {
        let options = EditorOptions::new()
            .continuity()
            .with_paper_direction(PaperDirection::Horizontal)
            .with_history_capacity(5)
            .with_debounce(Duration::from_millis(50));

        assert_eq!(options.page_mode, PageMode::Continuity);
        assert_eq!(options.paper_direction, PaperDirection::Horizontal);
        assert_eq!(options.history_capacity, 5);
        assert_eq!(options.debounce_window(), Duration::from_millis(50));
    }

    #[test]
    fn test_default_options() {
        let options = EditorOptions::default();
        assert_eq!(options.page_mode, PageMode::Paging);
        assert_eq!(options.mode, EditorMode::Edit);
        assert_eq!(options.content_width(), 554.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_horizontal_swaps_paper() {
        let options = EditorOptions::new().with_paper_direction(PaperDirection::Horizontal);
        assert_eq!(options.oriented_size(), (1123.0, 794.0));
        assert_eq!(options.content_width(), 883.0);
    }

    #[test]
    fn test_from_json_partial() {
        let options = EditorOptions::from_json(r#"{"page_mode":"continuity","default_size":12}"#)
            .unwrap();
        assert_eq!(options.page_mode, PageMode::Continuity);
        assert_eq!(options.default_size, 12);
        assert_eq!(options.width, 794.0);
    }

    #[test]
    fn test_validate_rejects_bad_margins() {
        let options = EditorOptions::new().with_margins(Margins::uniform(500.0));
        assert!(matches!(
            options.validate(),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(EditorMode::Edit.next(), EditorMode::Clean);
        assert_eq!(EditorMode::Design.next(), EditorMode::Edit);
        assert!(EditorMode::Print.is_readonly());
        assert!(!EditorMode::Form.is_readonly());
    }
}
