//! Document statistics.

use serde::{Deserialize, Serialize};

use crate::layout::{is_spaceless_script_char, Layout};
use crate::model::{Document, ElementKind};

/// Counts over the document body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of laid-out pages
    pub page_count: u32,

    /// Number of body elements
    pub element_count: usize,

    /// Number of paragraphs
    pub paragraph_count: usize,

    /// Number of tables
    pub table_count: usize,

    /// Number of images
    pub image_count: usize,

    /// Number of distinct hyperlinks
    pub hyperlink_count: usize,

    /// Number of checkboxes
    pub checkbox_count: usize,

    /// Number of distinct headings
    pub heading_count: usize,

    /// Word count (see [`count_words`])
    pub word_count: usize,

    /// Character count (excluding whitespace)
    pub char_count: usize,
}

impl DocumentStats {
    /// Collect statistics for `doc` laid out as `layout`.
    pub fn collect(doc: &Document, layout: &Layout) -> Self {
        let mut stats = Self {
            page_count: layout.page_count(),
            element_count: doc.main.len(),
            paragraph_count: usize::from(!doc.main.is_empty()),
            ..Default::default()
        };
        let mut last_link: Option<&str> = None;
        let mut last_title: Option<&str> = None;

        for element in &doc.main {
            match &element.kind {
                ElementKind::Table(_) => stats.table_count += 1,
                ElementKind::Image { .. } => stats.image_count += 1,
                ElementKind::Checkbox { .. } => stats.checkbox_count += 1,
                ElementKind::Hyperlink { hyperlink_id, .. } => {
                    if last_link != Some(hyperlink_id.as_str()) {
                        stats.hyperlink_count += 1;
                    }
                }
                _ if element.is_newline() => stats.paragraph_count += 1,
                _ => {}
            }
            last_link = match &element.kind {
                ElementKind::Hyperlink { hyperlink_id, .. } => Some(hyperlink_id.as_str()),
                _ => None,
            };

            let title = element.title.as_ref().map(|t| t.id.as_str());
            if title.is_some() && title != last_title {
                stats.heading_count += 1;
            }
            last_title = title;
        }

        stats.count_text(&doc.main.plain_text());
        stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += count_words(text);
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count();
    }
}

/// Count words: every CJK character is a word of its own, and any other
/// run of letters or digits is one word.
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;
    for c in text.chars() {
        if !c.is_alphanumeric() {
            in_word = false;
        } else if is_spaceless_script_char(c) {
            count += 1;
            in_word = false;
        } else if !in_word {
            count += 1;
            in_word = true;
        }
    }
    count
}
