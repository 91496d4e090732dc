//! Formatting, paragraph attributes and the format painter.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::insert::style_at_cursor;
use super::{CommandContext, Transition};
use crate::error::{Error, Result};
use crate::model::{Document, Element, ElementKind, ElementStyle, RowFlex, Title, Zone};
use crate::selection::Selection;

const SIZE_STEP: u16 = 2;
const MIN_SIZE: u16 = 8;
const MAX_SIZE: u16 = 72;

/// A character formatting attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum StyleAttribute {
    /// Toggle bold
    Bold,
    /// Toggle italic
    Italic,
    /// Toggle underline
    Underline,
    /// Toggle strikeout
    Strikeout,
    /// Set the font family
    Font(String),
    /// Set the font size
    Size(u16),
    /// Grow the font size by one step
    SizeAdd,
    /// Shrink the font size by one step
    SizeMinus,
    /// Set or clear the text color
    Color(Option<String>),
    /// Set or clear the highlight color
    Highlight(Option<String>),
    /// Turn the selected text into a link
    Url(String),
}

impl StyleAttribute {
    /// Current value of a toggle attribute; `None` for the others.
    fn flag(&self, style: &ElementStyle) -> Option<bool> {
        match self {
            StyleAttribute::Bold => Some(style.bold),
            StyleAttribute::Italic => Some(style.italic),
            StyleAttribute::Underline => Some(style.underline),
            StyleAttribute::Strikeout => Some(style.strikeout),
            _ => None,
        }
    }

    /// Apply the attribute to `style`. Toggles clear when `all_set`.
    fn restyle(&self, style: &mut ElementStyle, all_set: bool, default_size: u16) {
        let size = style.size.unwrap_or(default_size);
        match self {
            StyleAttribute::Bold => style.bold = !all_set,
            StyleAttribute::Italic => style.italic = !all_set,
            StyleAttribute::Underline => style.underline = !all_set,
            StyleAttribute::Strikeout => style.strikeout = !all_set,
            StyleAttribute::Font(font) => style.font = Some(font.clone()),
            StyleAttribute::Size(value) => style.size = Some(*value),
            StyleAttribute::SizeAdd => {
                if size + SIZE_STEP <= MAX_SIZE {
                    style.size = Some(size + SIZE_STEP);
                }
            }
            StyleAttribute::SizeMinus => {
                if size >= MIN_SIZE + SIZE_STEP {
                    style.size = Some(size - SIZE_STEP);
                }
            }
            StyleAttribute::Color(color) => style.color = color.clone(),
            StyleAttribute::Highlight(color) => style.highlight = color.clone(),
            StyleAttribute::Url(_) => {}
        }
    }
}

/// Style held by the format painter.
#[derive(Debug, Clone, PartialEq)]
pub struct PainterStyle {
    /// Captured style
    pub style: ElementStyle,
    /// Keep painting after the first application
    pub persistent: bool,
}

/// Apply `attribute` to the selection.
///
/// At a collapsed cursor the attribute is recorded for the next typed text
/// instead; links need a range.
pub(super) fn format_range(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    attribute: &StyleAttribute,
    ctx: &mut CommandContext,
) -> Result<Transition> {
    let default_size = ctx.options.default_size;
    if selection.is_collapsed() {
        if matches!(attribute, StyleAttribute::Url(_)) {
            return Err(Error::NoSelection);
        }
        let mut style = ctx
            .pending_style
            .take()
            .unwrap_or_else(|| style_at_cursor(doc, zone, selection));
        let all_set = attribute.flag(&style).unwrap_or(false);
        attribute.restyle(&mut style, all_set, default_size);
        ctx.pending_style = Some(style);
        return Ok(Transition::unchanged(zone, selection));
    }

    let mut next = doc.clone();
    let elements = &mut next.zone_mut(zone).as_mut_slice()[selection.range()];

    if let StyleAttribute::Url(url) = attribute {
        if !elements.iter().any(Element::is_text_like) {
            return Err(Error::InvalidElement(
                "a link needs text in the selection".to_string(),
            ));
        }
        let hyperlink_id = ctx.next_id("hyperlink");
        for element in elements.iter_mut().filter(|e| e.is_text_like()) {
            element.kind = ElementKind::Hyperlink {
                url: url.clone(),
                hyperlink_id: hyperlink_id.clone(),
            };
        }
    } else {
        let all_set = elements
            .iter()
            .all(|e| attribute.flag(&e.style).unwrap_or(false));
        for element in elements.iter_mut() {
            attribute.restyle(&mut element.style, all_set, default_size);
        }
    }
    Ok(Transition::edited(next, zone, selection))
}

/// Paragraphs touched by `selection`, split at line breaks, separators and
/// page breaks. A paragraph starts with its break element.
pub fn paragraph_ranges(elements: &[Element], selection: Selection) -> Vec<Range<usize>> {
    let len = elements.len();
    if len == 0 {
        return Vec::new();
    }
    let (first, last) = if selection.is_collapsed() {
        let anchor = selection.start().saturating_sub(1);
        (anchor, anchor)
    } else {
        (selection.start(), selection.end() - 1)
    };
    let first = first.min(len - 1);
    let last = last.min(len - 1);

    let mut start = (0..=first).rev().find(|&i| elements[i].is_break()).unwrap_or(0);
    let mut ranges = Vec::new();
    for (i, element) in elements.iter().enumerate().skip(start + 1) {
        if element.is_break() {
            ranges.push(start..i);
            if i > last {
                return ranges;
            }
            start = i;
        }
    }
    ranges.push(start..len);
    ranges
}

/// Align every paragraph touched by the selection.
pub(super) fn set_row_flex(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    row_flex: RowFlex,
) -> Result<Transition> {
    let mut next = doc.clone();
    let store = next.zone_mut(zone).as_mut_slice();
    for range in paragraph_ranges(store, selection) {
        for element in &mut store[range] {
            element.row_flex = Some(row_flex);
        }
    }
    Ok(Transition::edited(next, zone, selection))
}

/// Mark every paragraph touched by the selection as a heading of `level`,
/// or clear the marker when `level` is `None`. Each paragraph becomes its
/// own heading.
pub(super) fn set_title(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    level: Option<u8>,
    ctx: &mut CommandContext,
) -> Result<Transition> {
    let mut next = doc.clone();
    let store = next.zone_mut(zone).as_mut_slice();
    for range in paragraph_ranges(store, selection) {
        let title = level.map(|level| Title::new(ctx.next_id("title"), level));
        for element in &mut store[range] {
            element.title = title.clone();
        }
    }
    Ok(Transition::edited(next, zone, selection))
}

/// Reset the style of the selection, or of the whole zone at a cursor.
pub(super) fn clear_format(doc: &Document, zone: Zone, selection: Selection) -> Result<Transition> {
    let mut next = doc.clone();
    let store = next.zone_mut(zone).as_mut_slice();
    let range = if selection.is_collapsed() {
        0..store.len()
    } else {
        selection.range()
    };
    for element in &mut store[range] {
        element.style = ElementStyle::default();
    }
    Ok(Transition::edited(next, zone, selection))
}

/// Capture the style at the selection into the painter.
pub(super) fn capture_painter(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    persistent: bool,
    ctx: &mut CommandContext,
) -> Transition {
    let style = if selection.is_collapsed() {
        style_at_cursor(doc, zone, selection)
    } else {
        doc.zone(zone)
            .element(selection.start())
            .map(|e| e.style.clone())
            .unwrap_or_default()
    };
    log::debug!("Painter captured style (persistent: {})", persistent);
    ctx.painter = Some(PainterStyle { style, persistent });
    Transition::unchanged(zone, selection)
}

/// Paint the captured style onto the selection.
///
/// A single-shot painter is spent by the first application.
pub(super) fn apply_painter(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    ctx: &mut CommandContext,
) -> Result<Transition> {
    let painter = match &ctx.painter {
        Some(painter) if !selection.is_collapsed() => painter.clone(),
        _ => return Ok(Transition::unchanged(zone, selection)),
    };
    let mut next = doc.clone();
    for element in &mut next.zone_mut(zone).as_mut_slice()[selection.range()] {
        element.style = painter.style.clone();
    }
    if !painter.persistent {
        ctx.painter = None;
    }
    Ok(Transition::edited(next, zone, selection))
}
