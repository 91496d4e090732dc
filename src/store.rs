//! Ordered element storage.
//!
//! Every structural edit of a document is expressed as a [`ElementStore::splice`].

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Element;

/// An ordered sequence of elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementStore {
    elements: Vec<Element>,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the elements in `range`.
    pub fn get(&self, range: Range<usize>) -> Result<&[Element]> {
        if range.start > range.end {
            return Err(Error::InvalidRange {
                start: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        if range.end > self.len() {
            return Err(Error::OutOfRange {
                position: range.end,
                len: self.len(),
            });
        }
        Ok(&self.elements[range])
    }

    /// Get a single element.
    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Get a single element for in-place replacement.
    pub(crate) fn element_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.elements.get_mut(index)
    }

    /// Borrow all elements for in-place restyling.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Remove `delete_count` elements at `position` and insert `new_elements`
    /// in their place, returning the removed elements.
    pub fn splice(
        &mut self,
        position: usize,
        delete_count: usize,
        new_elements: Vec<Element>,
    ) -> Result<Vec<Element>> {
        let len = self.len();
        if position > len {
            return Err(Error::OutOfRange { position, len });
        }
        let end = position
            .checked_add(delete_count)
            .filter(|end| *end <= len)
            .ok_or(Error::OutOfRange {
                position: position.saturating_add(delete_count),
                len,
            })?;
        Ok(self.elements.splice(position..end, new_elements).collect())
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Borrow all elements.
    pub fn as_slice(&self) -> &[Element] {
        &self.elements
    }

    /// Take the elements out of the store.
    pub fn into_vec(self) -> Vec<Element> {
        self.elements
    }

    /// Concatenated display text of all elements.
    pub fn plain_text(&self) -> String {
        self.elements.iter().map(Element::display_text).collect()
    }
}

impl From<Vec<Element>> for ElementStore {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl<'a> IntoIterator for &'a ElementStore {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
