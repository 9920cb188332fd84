use glam::Vec2;

use crate::api::config::PracticeConfig;

/// Maps on-screen (client) pointer coordinates into canvas bitmap space.
///
/// The canvas element may be displayed at a different size than its bitmap
/// resolution (responsive layout, CSS scaling). Strokes must land where the
/// pointer is, so every position is scaled by `bitmap / display`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    /// Bitmap resolution in pixels.
    pub bitmap: Vec2,
    /// Top-left of the displayed element in client coordinates.
    pub origin: Vec2,
    /// Displayed element size in client pixels.
    pub display: Vec2,
}

impl CanvasViewport {
    /// A viewport where the element is displayed at its bitmap size at the origin.
    pub fn new(bitmap: Vec2) -> Self {
        Self {
            bitmap,
            origin: Vec2::ZERO,
            display: bitmap,
        }
    }

    /// Update the on-screen rectangle (e.g. from `getBoundingClientRect`).
    pub fn set_display_rect(&mut self, origin: Vec2, size: Vec2) {
        self.origin = origin;
        self.display = size;
    }

    /// Per-axis scale from client pixels to bitmap pixels.
    /// A collapsed axis (zero display size) maps 1:1.
    pub fn scale(&self) -> Vec2 {
        let axis = |bitmap: f32, display: f32| {
            if display > 0.0 {
                bitmap / display
            } else {
                1.0
            }
        };
        Vec2::new(
            axis(self.bitmap.x, self.display.x),
            axis(self.bitmap.y, self.display.y),
        )
    }

    /// Convert a client position into bitmap coordinates.
    pub fn to_bitmap(&self, client: Vec2) -> Vec2 {
        (client - self.origin) * self.scale()
    }
}

/// Responsive canvas size: the parent's width capped at the configured
/// maximum, with a fixed height.
pub fn fit_canvas(parent_width: f32, config: &PracticeConfig) -> Vec2 {
    let width = parent_width.min(config.canvas_max_width).max(0.0).floor();
    Vec2::new(width, config.canvas_height)
}
