//! Insertion and deletion.

use super::{spliced, CommandContext, Transition};
use crate::error::Result;
use crate::model::{split_elements, Document, Element, ElementKind, ElementStyle, Zone};
use crate::selection::Selection;

/// Replace the selection with `elements`; the cursor lands after them.
pub(super) fn insert_elements(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    elements: Vec<Element>,
    ctx: &mut CommandContext,
) -> Result<Transition> {
    let mut elements = split_elements(elements);
    if let Some(pending) = ctx.pending_style.take() {
        for element in elements.iter_mut().filter(|e| e.is_text_like()) {
            element.style = element.style.merged_with(&pending);
        }
    }
    if elements.is_empty() && selection.is_collapsed() {
        return Ok(Transition::unchanged(zone, selection));
    }
    let count = elements.len();
    let next = spliced(doc, zone, selection.start(), selection.len(), elements)?;
    Ok(Transition::edited(
        next,
        zone,
        Selection::collapsed(selection.start() + count),
    ))
}

/// Type `text` at the cursor.
///
/// Characters continue the element before the cursor: they inherit its
/// style, alignment and heading. A typed line break ends the heading. A
/// style recorded at the cursor replaces the inherited one.
pub(super) fn insert_text(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    text: &str,
    ctx: &mut CommandContext,
) -> Result<Transition> {
    let previous = selection
        .start()
        .checked_sub(1)
        .and_then(|i| doc.zone(zone).element(i))
        .filter(|prev| prev.is_text());
    let mut style = previous.map(|p| p.style.clone()).unwrap_or_default();
    if let Some(pending) = ctx.pending_style.take() {
        style = pending;
    }
    let row_flex = previous.and_then(|p| p.row_flex);
    let mut title = previous.and_then(|p| p.title.clone());

    let mut elements = Vec::with_capacity(text.len());
    for c in text.chars() {
        let mut element = Element::text(c.to_string()).with_style(style.clone());
        element.row_flex = row_flex;
        if element.is_newline() {
            title = None;
        }
        element.title = title.clone();
        elements.push(element);
    }
    insert_elements(doc, zone, selection, elements, ctx)
}

/// Insert a hyperlink whose characters share one link id.
pub(super) fn insert_hyperlink(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    text: &str,
    url: &str,
    ctx: &mut CommandContext,
) -> Result<Transition> {
    let label = if text.is_empty() { url } else { text };
    let mut link = Element::hyperlink(label, url);
    if let ElementKind::Hyperlink { hyperlink_id, .. } = &mut link.kind {
        *hyperlink_id = ctx.next_id("hyperlink");
    }
    insert_elements(doc, zone, selection, vec![link], ctx)
}

/// Delete the selection, or the element before a collapsed cursor.
pub(super) fn backspace(doc: &Document, zone: Zone, selection: Selection) -> Result<Transition> {
    if !selection.is_collapsed() {
        return delete_range(doc, zone, selection.start(), selection.len());
    }
    match selection.start().checked_sub(1) {
        Some(position) => delete_range(doc, zone, position, 1),
        None => Ok(Transition::unchanged(zone, selection)),
    }
}

/// Delete the selection, or the element after a collapsed cursor.
pub(super) fn delete_forward(
    doc: &Document,
    zone: Zone,
    selection: Selection,
) -> Result<Transition> {
    if !selection.is_collapsed() {
        return delete_range(doc, zone, selection.start(), selection.len());
    }
    if selection.start() >= doc.zone(zone).len() {
        return Ok(Transition::unchanged(zone, selection));
    }
    delete_range(doc, zone, selection.start(), 1)
}

fn delete_range(doc: &Document, zone: Zone, position: usize, count: usize) -> Result<Transition> {
    let next = spliced(doc, zone, position, count, Vec::new())?;
    Ok(Transition::edited(next, zone, Selection::collapsed(position)))
}

/// Style a collapsed cursor would give typed text.
pub(super) fn style_at_cursor(doc: &Document, zone: Zone, selection: Selection) -> ElementStyle {
    selection
        .start()
        .checked_sub(1)
        .and_then(|i| doc.zone(zone).element(i))
        .map(|e| e.style.clone())
        .unwrap_or_default()
}
