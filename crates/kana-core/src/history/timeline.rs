use crate::api::types::{Frame, Snapshot};

/// Cursor value meaning "no strokes yet, only the seeded glyph is shown".
pub const SEEDED: i32 = -1;

/// Linear undo/redo timeline of canvas snapshots for one character.
///
/// Invariant: `-1 <= cursor <= snapshots.len() - 1`. A new commit always
/// drops the redo tail; there is no branching history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    snapshots: Vec<Snapshot>,
    cursor: i32,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: SEEDED,
        }
    }

    /// Rebuild a timeline from persisted parts.
    /// Returns `None` if the cursor is out of range for the snapshots.
    pub fn from_parts(snapshots: Vec<Snapshot>, cursor: i32) -> Option<Self> {
        if cursor < SEEDED || cursor >= snapshots.len() as i32 {
            return None;
        }
        Some(Self { snapshots, cursor })
    }

    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.cursor = SEEDED;
    }

    /// Truncate the redo tail, append `snapshot`, and move the cursor to it.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate((self.cursor + 1) as usize);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() as i32 - 1;
    }

    /// Step back one stroke. At cursor 0 this lands on the seeded state.
    /// Returns `None` (no-op) when already at the seeded state.
    pub fn undo(&mut self) -> Option<Frame<'_>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Step forward one stroke. Returns `None` (no-op) at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor as usize)
    }

    /// The frame one undo step away, without moving.
    pub fn peek_undo(&self) -> Option<Frame<'_>> {
        if !self.can_undo() {
            return None;
        }
        Some(self.frame_at(self.cursor - 1))
    }

    /// The snapshot one redo step away, without moving.
    pub fn peek_redo(&self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.snapshots.get((self.cursor + 1) as usize)
    }

    /// What the canvas should currently display.
    pub fn current(&self) -> Frame<'_> {
        self.frame_at(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > SEEDED
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.snapshots.len() as i32 - 1
    }

    pub fn cursor(&self) -> i32 {
        self.cursor
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    fn frame_at(&self, cursor: i32) -> Frame<'_> {
        if cursor < 0 {
            return Frame::Seeded;
        }
        match self.snapshots.get(cursor as usize) {
            Some(s) => Frame::Snapshot(s),
            None => Frame::Seeded,
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
