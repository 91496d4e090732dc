//! Element measurement.
//!
//! No fonts are loaded: glyph advance is derived from the terminal column
//! width of each character, so a full-width (CJK) glyph is one em and
//! everything else half an em.

use unicode_width::UnicodeWidthChar;

use super::LayoutConfig;
use crate::model::{Element, ElementKind};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.25;

/// Measured extent of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Advance along the row
    pub width: f32,
    /// Height the element needs in its row
    pub height: f32,
}

/// Measures elements against a layout configuration.
#[derive(Debug, Clone, Copy)]
pub struct Measurer<'a> {
    config: &'a LayoutConfig,
}

impl<'a> Measurer<'a> {
    /// Create a measurer.
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Font size of an element, falling back to the default size.
    pub fn font_size(&self, element: &Element) -> f32 {
        f32::from(element.style.size.unwrap_or(self.config.default_size))
    }

    /// Height of one line of text at `size`.
    pub fn line_height(&self, size: f32) -> f32 {
        size * LINE_HEIGHT_RATIO * self.config.row_margin
    }

    /// Advance of a run of text at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|c| char_width(c, size)).sum()
    }

    /// Measure an element.
    pub fn measure(&self, element: &Element) -> Metrics {
        let size = self.font_size(element);
        let line_height = self.line_height(size);
        match &element.kind {
            ElementKind::Text | ElementKind::Hyperlink { .. } => {
                let width = if element.is_newline() {
                    0.0
                } else {
                    self.text_width(&element.value, size)
                };
                Metrics {
                    width,
                    height: line_height,
                }
            }
            ElementKind::Image { width, height } => Metrics {
                width: width.max(0.0),
                height: height.max(0.0),
            },
            ElementKind::Table(table) => Metrics {
                width: table.width(),
                height: table.height(),
            },
            ElementKind::Checkbox { .. } => Metrics {
                width: self.config.checkbox_size,
                height: self.config.checkbox_size.max(line_height),
            },
            ElementKind::Date { .. } => Metrics {
                width: self.text_width(&element.display_text(), size),
                height: line_height,
            },
            ElementKind::Control { .. } => {
                let text = element.display_text();
                let lines = text.split('\n').count().max(1);
                let width = text
                    .split('\n')
                    .map(|line| self.text_width(line, size))
                    .fold(0.0, f32::max);
                Metrics {
                    width,
                    height: line_height * lines as f32,
                }
            }
            ElementKind::Separator => Metrics {
                width: self.config.content_width(),
                height: line_height,
            },
            ElementKind::PageBreak => Metrics {
                width: 0.0,
                height: line_height,
            },
        }
    }
}

/// Advance of one character at `size`.
pub fn char_width(c: char, size: f32) -> f32 {
    let columns = c.width().unwrap_or(0);
    columns as f32 * size * 0.5
}

/// Check if a character belongs to a script written without word spaces.
///
/// Line breaks may occur between any two such characters, and each one
/// counts as a word of its own.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // CJK Unified Ideographs Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana
    || (0x3040..=0x309F).contains(&code)
    // Katakana
    || (0x30A0..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
    // Fullwidth forms
    || (0xFF00..=0xFFEF).contains(&code)
}

/// Check if an element continues an unbreakable word.
pub fn is_word_char(element: &Element) -> bool {
    if !element.is_text_like() {
        return false;
    }
    let mut chars = element.value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !c.is_whitespace() && !is_spaceless_script_char(c),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;
    use crate::options::EditorOptions;

    fn config() -> LayoutConfig {
        LayoutConfig::from(&EditorOptions::default())
    }

    #[test]
    fn test_char_width() {
        assert_eq!(char_width('a', 16.0), 8.0);
        assert_eq!(char_width('中', 16.0), 16.0);
        assert_eq!(char_width('\u{0007}', 16.0), 0.0);
    }

    #[test]
    fn test_measure_text_and_newline() {
        let config = config();
        let m = Measurer::new(&config);
        assert_eq!(
            m.measure(&Element::text("a")),
            Metrics {
                width: 8.0,
                height: 20.0
            }
        );
        assert_eq!(m.measure(&Element::newline()).width, 0.0);
        assert_eq!(m.measure(&Element::text("a").with_size(32)).width, 16.0);
    }

    #[test]
    fn test_measure_atomic_elements() {
        let config = config();
        let m = Measurer::new(&config);
        assert_eq!(
            m.measure(&Element::image("x", 100.0, 50.0)),
            Metrics {
                width: 100.0,
                height: 50.0
            }
        );
        let table = Table::new(2, 2, 300.0, 40.0).unwrap();
        assert_eq!(m.measure(&Element::table(table)).height, 80.0);
        assert_eq!(m.measure(&Element::separator()).width, 554.0);

        let control = m.measure(&Element::control("ab\nabcd"));
        assert_eq!(control.width, 32.0);
        assert_eq!(control.height, 40.0);
    }

    #[test]
    fn test_word_chars() {
        assert!(is_word_char(&Element::text("a")));
        assert!(!is_word_char(&Element::text(" ")));
        assert!(!is_word_char(&Element::text("中")));
        assert!(!is_word_char(&Element::newline()));
        assert!(!is_word_char(&Element::checkbox(false)));
        assert!(is_spaceless_script_char('カ'));
        assert!(!is_spaceless_script_char('한'));
    }
}
