//! Test doubles shared by the unit tests.

use glam::Vec2;

use crate::api::types::Snapshot;
use crate::renderer::surface::{GlyphStyle, RenderSurface, StrokeStyle, SurfaceError};

const PREFIX: &str = "data:fake,";

/// A surface that records drawing operations as text "pixels".
///
/// Snapshots encode the recorded operations, so comparing snapshots compares
/// what is on screen.
#[derive(Debug)]
pub struct FakeSurface {
    size: Vec2,
    pub ops: Vec<String>,
    pub available: bool,
    pub restores: usize,
}

impl FakeSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ops: Vec::new(),
            available: true,
            restores: 0,
        }
    }

    /// The encoded form of whatever is currently displayed.
    pub fn displayed(&self) -> Snapshot {
        Snapshot::new(format!("{PREFIX}{}", self.ops.join("|")))
    }

    fn check(&self) -> Result<(), SurfaceError> {
        if self.available {
            Ok(())
        } else {
            Err(SurfaceError::Unavailable("no 2d context".into()))
        }
    }
}

impl RenderSurface for FakeSurface {
    fn bitmap_size(&self) -> Vec2 {
        self.size
    }

    fn resize(&mut self, size: Vec2) {
        self.size = size;
        self.ops.clear();
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.check()?;
        self.ops.clear();
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: &str, _style: &GlyphStyle) -> Result<(), SurfaceError> {
        self.check()?;
        self.ops.push(format!("glyph:{glyph}"));
        Ok(())
    }

    fn begin_path(&mut self, _at: Vec2) -> Result<(), SurfaceError> {
        self.check()
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, _style: &StrokeStyle) -> Result<(), SurfaceError> {
        self.check()?;
        self.ops
            .push(format!("line:{},{}->{},{}", from.x, from.y, to.x, to.y));
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot, SurfaceError> {
        self.check()?;
        Ok(self.displayed())
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        self.check()?;
        let body = snapshot
            .as_str()
            .strip_prefix(PREFIX)
            .ok_or_else(|| SurfaceError::Restore("not a fake snapshot".into()))?;
        self.ops = if body.is_empty() {
            Vec::new()
        } else {
            body.split('|').map(str::to_string).collect()
        };
        self.restores += 1;
        Ok(())
    }
}

/// A distinct snapshot for timeline-level tests.
pub fn snap(n: u32) -> Snapshot {
    Snapshot::new(format!("{PREFIX}s{n}"))
}
