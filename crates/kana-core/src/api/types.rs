use serde::{Deserialize, Serialize};

/// A full raster capture of the canvas, encoded as a data-URL style string
/// (e.g. `data:image/png;base64,...`).
///
/// Snapshots are opaque to the core: they are produced by a
/// [`RenderSurface`](crate::renderer::surface::RenderSurface) and handed back
/// to it verbatim on undo/redo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded image string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the canvas should show for a given cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Only the seeded glyph, no user strokes (cursor == -1).
    Seeded,
    /// A committed snapshot.
    Snapshot(&'a Snapshot),
}

impl<'a> Frame<'a> {
    pub fn snapshot(&self) -> Option<&'a Snapshot> {
        match *self {
            Frame::Seeded => None,
            Frame::Snapshot(s) => Some(s),
        }
    }
}
