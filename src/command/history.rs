use serde::{Deserialize, Serialize};

/// An immutable full-document snapshot: the serialized scene graph
/// plus the canvas dimensions at the time it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub json: String,
    pub width: u32,
    pub height: u32,
}

/// Linear undo/redo over full-document snapshots.
///
/// One snapshot per committed command, no coalescing of rapid edits.
/// The cursor always points at a valid index in `[0, len)`; index 0 is
/// the state the session started from.
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: usize,
}

impl History {
    /// Create a history seeded with the initial document state
    pub fn new(initial: Snapshot) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Record a snapshot after a committed mutation. Any entries after
    /// the cursor are discarded: a new edit made after an undo drops
    /// the redo future.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot, if possible
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot, if possible
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    /// The snapshot the cursor currently points at
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of recorded snapshots, the initial state included
    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }
}
