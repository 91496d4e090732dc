//! Selection and cursor model.
//!
//! Positions are gaps between elements: `0` is before the first element and
//! `len` is after the last one.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A `(start, end)` range over the active zone; collapsed when `start == end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    start: usize,
    end: usize,
}

impl Selection {
    /// Create a selection, checking `start <= end <= len`.
    pub fn new(start: usize, end: usize, len: usize) -> Result<Self> {
        if start > end || end > len {
            return Err(Error::InvalidRange { start, end, len });
        }
        Ok(Self { start, end })
    }

    /// A collapsed cursor at `position`.
    pub fn collapsed(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Start of the range.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End of the range.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The selection as `start..end`.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of selected elements.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if this is a pure cursor.
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Collapse onto `position`, checking it against `len`.
    pub fn collapse_to(&mut self, position: usize, len: usize) -> Result<()> {
        if position > len {
            return Err(Error::OutOfRange { position, len });
        }
        *self = Self::collapsed(position);
        Ok(())
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamped(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }

    /// Check if the element at `index` is inside the range.
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }
}
