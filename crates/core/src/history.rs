//! Undo history - bounded stack of snapshots
//!
//! Newest entries are popped first. Once the stack holds `capacity` snapshots,
//! pushing another drops the oldest one.

use std::collections::VecDeque;

use crate::error::GameError;
use crate::snapshot::Snapshot;
use crate::types::DEFAULT_UNDO_SIZE;

#[derive(Debug, Clone)]
pub struct UndoHistory {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl UndoHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Result<Snapshot, GameError> {
        self.entries.pop_back().ok_or(GameError::EmptyHistory)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_SIZE)
    }
}
