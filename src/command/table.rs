//! Commands on the table at the cursor.

use super::{spliced, Transition};
use crate::error::{Error, Result};
use crate::model::{Document, ElementKind, Table, Zone};
use crate::selection::Selection;

/// Index of the table the cursor is on: the element at the selection start
/// or the one just before it.
fn table_index(doc: &Document, zone: Zone, selection: Selection) -> Result<usize> {
    let store = doc.zone(zone);
    let start = selection.start();
    [Some(start), start.checked_sub(1)]
        .into_iter()
        .flatten()
        .find(|&i| store.element(i).is_some_and(|e| e.is_table()))
        .ok_or(Error::NoTable)
}

/// Run `edit` on a copy of the table at the cursor.
pub(super) fn edit_table<F>(
    doc: &Document,
    zone: Zone,
    selection: Selection,
    edit: F,
) -> Result<Transition>
where
    F: FnOnce(&mut Table) -> Result<()>,
{
    let index = table_index(doc, zone, selection)?;
    let mut next = doc.clone();
    if let Some(element) = next.zone_mut(zone).element_mut(index) {
        if let ElementKind::Table(table) = &mut element.kind {
            edit(table)?;
        }
    }
    Ok(Transition::edited(next, zone, selection))
}

/// Remove the table at the cursor.
pub(super) fn delete_table(
    doc: &Document,
    zone: Zone,
    selection: Selection,
) -> Result<Transition> {
    let index = table_index(doc, zone, selection)?;
    let next = spliced(doc, zone, index, 1, Vec::new())?;
    Ok(Transition::edited(next, zone, Selection::collapsed(index)))
}
