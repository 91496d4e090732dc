//! Bounded undo/redo history of document snapshots.

use std::collections::VecDeque;

use crate::model::{Document, Zone};
use crate::selection::Selection;

/// Editor state captured around a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The whole document
    pub document: Document,
    /// Selection in the active zone
    pub selection: Selection,
    /// Active zone
    pub zone: Zone,
}

/// One committed command: the state before and after it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// State the command started from
    pub before: Snapshot,
    /// State the command produced
    pub after: Snapshot,
}

/// Undo and redo stacks.
///
/// Pushing a fresh entry discards everything that could be redone. Once
/// `capacity` entries are held the oldest one is evicted.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` undo entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a committed command.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.redo.clear();
        self.undo.push_back(entry);
        self.trim();
    }

    fn trim(&mut self) {
        while self.undo.len() > self.capacity {
            if self.undo.pop_front().is_some() {
                log::debug!("History full, evicted oldest entry");
            }
        }
    }

    /// Step back; returns the state to restore.
    pub fn undo(&mut self) -> Option<Snapshot> {
        let entry = self.undo.pop_back()?;
        let before = entry.before.clone();
        self.redo.push(entry);
        Some(before)
    }

    /// Step forward again; returns the state to restore.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let entry = self.redo.pop()?;
        let after = entry.after.clone();
        self.undo.push_back(entry);
        self.trim();
        Some(after)
    }

    /// Number of undoable entries.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable entries.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Check if undo would do anything.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Check if redo would do anything.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Maximum number of undo entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, evicting the oldest entries if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim();
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}
