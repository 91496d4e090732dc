//! Element-level types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::date::format_date;
use super::Table;

/// Value of a line-break text element.
pub const NEWLINE: &str = "\n";

/// The smallest content unit of a document.
///
/// Text and hyperlink elements hold a single character once a document has
/// been normalised (see [`split_elements`]); every other kind is an atomic
/// layout unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Payload; meaning depends on the kind
    #[serde(default)]
    pub value: String,

    /// Element kind and kind-specific fields
    #[serde(flatten)]
    pub kind: ElementKind,

    /// Character formatting
    #[serde(default, skip_serializing_if = "ElementStyle::is_plain")]
    pub style: ElementStyle,

    /// Alignment of the row this element starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_flex: Option<RowFlex>,

    /// Heading marker used by the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

impl Element {
    fn with_kind(value: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            value: value.into(),
            kind,
            style: ElementStyle::default(),
            row_flex: None,
            title: None,
        }
    }

    /// Create a text element.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(text, ElementKind::Text)
    }

    /// Create a line-break element.
    pub fn newline() -> Self {
        Self::text(NEWLINE)
    }

    /// Create an image element; `src` is typically a data URL.
    pub fn image(src: impl Into<String>, width: f32, height: f32) -> Self {
        Self::with_kind(src, ElementKind::Image { width, height })
    }

    /// Create a table element.
    pub fn table(table: Table) -> Self {
        Self::with_kind("", ElementKind::Table(table))
    }

    /// Create a hyperlink element.
    pub fn hyperlink(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self::with_kind(
            text,
            ElementKind::Hyperlink {
                url: url.into(),
                hyperlink_id: String::new(),
            },
        )
    }

    /// Create a checkbox element.
    pub fn checkbox(checked: bool) -> Self {
        Self::with_kind("", ElementKind::Checkbox { checked })
    }

    /// Create a date element stamped with `at`.
    pub fn date(date_format: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::with_kind(
            at.to_rfc3339(),
            ElementKind::Date {
                date_format: date_format.into(),
            },
        )
    }

    /// Create a control (code block) element.
    pub fn control(value: impl Into<String>) -> Self {
        Self::with_kind(value, ElementKind::Control { placeholder: None })
    }

    /// Create a separator element.
    pub fn separator() -> Self {
        Self::with_kind(NEWLINE, ElementKind::Separator)
    }

    /// Create a page-break element.
    pub fn page_break() -> Self {
        Self::with_kind(NEWLINE, ElementKind::PageBreak)
    }

    /// Set the character style.
    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the font size.
    pub fn with_size(mut self, size: u16) -> Self {
        self.style.size = Some(size);
        self
    }

    /// Set the row alignment.
    pub fn with_row_flex(mut self, row_flex: RowFlex) -> Self {
        self.row_flex = Some(row_flex);
        self
    }

    /// Mark the element as part of a heading.
    pub fn with_title(mut self, title: Title) -> Self {
        self.title = Some(title);
        self
    }

    /// Check if this is a text element.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text)
    }

    /// Check if this element carries searchable characters (text or hyperlink).
    pub fn is_text_like(&self) -> bool {
        matches!(self.kind, ElementKind::Text | ElementKind::Hyperlink { .. })
    }

    /// Check if this is a line-break element.
    pub fn is_newline(&self) -> bool {
        self.is_text() && self.value == NEWLINE
    }

    /// Check if this is a table element.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, ElementKind::Table(_))
    }

    /// Check if this element forces a row break.
    pub fn is_break(&self) -> bool {
        self.is_newline() || matches!(self.kind, ElementKind::Separator | ElementKind::PageBreak)
    }

    /// Text shown for this element when laid out or exported.
    pub fn display_text(&self) -> String {
        match &self.kind {
            ElementKind::Text | ElementKind::Hyperlink { .. } => self.value.clone(),
            ElementKind::Date { date_format } => format_date(&self.value, date_format),
            ElementKind::Control { placeholder } => {
                if self.value.is_empty() {
                    placeholder.clone().unwrap_or_default()
                } else {
                    self.value.clone()
                }
            }
            ElementKind::Checkbox { checked } => {
                if *checked {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            ElementKind::Table(table) => table.plain_text(),
            ElementKind::Separator | ElementKind::PageBreak => NEWLINE.to_string(),
            ElementKind::Image { .. } => String::new(),
        }
    }

    /// Short lowercase name of the element kind.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ElementKind::Text => "text",
            ElementKind::Image { .. } => "image",
            ElementKind::Table(_) => "table",
            ElementKind::Hyperlink { .. } => "hyperlink",
            ElementKind::Checkbox { .. } => "checkbox",
            ElementKind::Date { .. } => "date",
            ElementKind::Control { .. } => "control",
            ElementKind::Separator => "separator",
            ElementKind::PageBreak => "page_break",
        }
    }
}

/// Kind of an element together with its kind-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// A single character of text (or a line break)
    Text,

    /// An image of declared size
    Image {
        /// Width in pixels
        width: f32,
        /// Height in pixels
        height: f32,
    },

    /// A table
    Table(Table),

    /// A character belonging to a hyperlink
    Hyperlink {
        /// Link target
        url: String,
        /// Shared by all characters of one link
        #[serde(default)]
        hyperlink_id: String,
    },

    /// A checkbox
    Checkbox {
        /// Checked state
        #[serde(default)]
        checked: bool,
    },

    /// A date; `value` holds an RFC 3339 timestamp
    Date {
        /// Display pattern, e.g. `yyyy-MM-dd`
        date_format: String,
    },

    /// A control holding free text such as a code block
    Control {
        /// Text shown while the control is empty
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },

    /// A horizontal separator on its own row
    Separator,

    /// An explicit page break
    PageBreak,
}

/// Character formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    /// Bold text
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,

    /// Italic text
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,

    /// Underlined text
    #[serde(skip_serializing_if = "is_false")]
    pub underline: bool,

    /// Struck-through text
    #[serde(skip_serializing_if = "is_false")]
    pub strikeout: bool,

    /// Font family
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    /// Font size in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u16>,

    /// Text color (hex format, e.g., "#FF0000")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Highlight color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ElementStyle {
    /// Check if no formatting is applied.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay the attributes set in `other` onto this style.
    ///
    /// Flags from `other` win only when set; optional attributes win when present.
    pub fn merged_with(&self, other: &ElementStyle) -> ElementStyle {
        ElementStyle {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikeout: self.strikeout || other.strikeout,
            font: other.font.clone().or_else(|| self.font.clone()),
            size: other.size.or(self.size),
            color: other.color.clone().or_else(|| self.color.clone()),
            highlight: other.highlight.clone().or_else(|| self.highlight.clone()),
        }
    }
}

/// Row alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFlex {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

/// Heading marker; consecutive elements sharing an id form one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Heading identifier
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

impl Title {
    /// Create a heading marker; the level is clamped to 1-6.
    pub fn new(id: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            level: level.clamp(1, 6),
        }
    }
}

/// Normalise a caller-supplied element list.
///
/// Text and hyperlink values are split into one element per character and
/// empty text elements are dropped. Other elements, including separators
/// and page breaks, pass through untouched and in order.
pub fn split_elements(elements: Vec<Element>) -> Vec<Element> {
    let mut result = Vec::with_capacity(elements.len());
    for element in elements {
        if !element.is_text_like() {
            result.push(element);
            continue;
        }
        if element.value.chars().nth(1).is_none() {
            if !element.value.is_empty() {
                result.push(element);
            }
            continue;
        }
        for ch in element.value.chars() {
            let mut piece = element.clone();
            piece.value = ch.to_string();
            result.push(piece);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_elements_text() {
        let elements = split_elements(vec![
            Element::text("ab").with_size(20),
            Element::separator(),
            Element::text(""),
            Element::text("c"),
        ]);

        let values: Vec<_> = elements.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b", "\n", "c"]);
        assert_eq!(elements[1].style.size, Some(20));
        assert!(matches!(elements[2].kind, ElementKind::Separator));
    }

    #[test]
    fn test_split_elements_hyperlink_keeps_url() {
        let elements = split_elements(vec![Element::hyperlink("go", "https://example.com")]);
        assert_eq!(elements.len(), 2);
        for element in &elements {
            assert!(matches!(
                &element.kind,
                ElementKind::Hyperlink { url, .. } if url == "https://example.com"
            ));
        }
    }

    #[test]
    fn test_style_merge() {
        let base = ElementStyle {
            bold: true,
            size: Some(12),
            ..Default::default()
        };
        let overlay = ElementStyle {
            italic: true,
            size: Some(20),
            ..Default::default()
        };
        let merged = base.merged_with(&overlay);
        assert!(merged.bold);
        assert!(merged.italic);
        assert_eq!(merged.size, Some(20));
        assert!(ElementStyle::default().is_plain());
    }

    #[test]
    fn test_element_json_shape() {
        let json = serde_json::to_string(&Element::checkbox(true)).unwrap();
        assert!(json.contains("\"type\":\"checkbox\""));
        assert!(json.contains("\"checked\":true"));

        let parsed: Element =
            serde_json::from_str(r#"{"type":"image","value":"data:x","width":10,"height":5}"#)
                .unwrap();
        assert_eq!(parsed, Element::image("data:x", 10.0, 5.0));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Element::checkbox(false).display_text(), "[ ]");
        assert_eq!(Element::control("let x = 1;").display_text(), "let x = 1;");
        assert!(Element::separator().is_break());
        assert!(Element::newline().is_break());
        assert!(!Element::text("a").is_break());
    }

    #[test]
    fn test_title_level_clamped() {
        assert_eq!(Title::new("t", 9).level, 6);
        assert_eq!(Title::new("t", 0).level, 1);
    }
}
