//! Rendering surface contract.
//!
//! All pixel work happens outside the core (a browser 2D canvas in
//! `kana-web`). The core only drives the surface through this trait and
//! treats the snapshots it produces as opaque.

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::api::types::Snapshot;

#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The drawing context could not be acquired.
    #[error("rendering surface unavailable: {0}")]
    Unavailable(String),
    /// The surface could not encode its pixels into a snapshot.
    #[error("failed to capture snapshot: {0}")]
    Capture(String),
    /// A snapshot could not be decoded back onto the surface.
    #[error("failed to restore snapshot: {0}")]
    Restore(String),
}

/// Style of the tracing guide glyph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlyphStyle {
    /// CSS font shorthand (default: "80px Arial").
    pub font: String,
    /// CSS fill colour (default: "black").
    pub fill: String,
    /// Baseline origin in bitmap pixels (default: [20, 120]).
    pub origin: [f32; 2],
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            font: "80px Arial".into(),
            fill: "black".into(),
            origin: [20.0, 120.0],
        }
    }
}

/// Style of user strokes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrokeStyle {
    /// CSS stroke colour (default: "black").
    pub color: String,
    /// Line width in bitmap pixels (default: 1).
    pub line_width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "black".into(),
            line_width: 1.0,
        }
    }
}

/// A 2D raster the practice session draws on.
///
/// Coordinates are in bitmap space. Implementations are expected to be
/// cheap to call per pointer event.
pub trait RenderSurface {
    /// Current bitmap resolution in pixels.
    fn bitmap_size(&self) -> Vec2;

    /// Change the bitmap resolution. Existing pixels are discarded.
    fn resize(&mut self, size: Vec2);

    /// Erase every pixel.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Draw the tracing guide glyph.
    fn draw_glyph(&mut self, glyph: &str, style: &GlyphStyle) -> Result<(), SurfaceError>;

    /// Start a new stroke path at `at`.
    fn begin_path(&mut self, at: Vec2) -> Result<(), SurfaceError>;

    /// Draw one stroke segment.
    fn draw_line(&mut self, from: Vec2, to: Vec2, style: &StrokeStyle) -> Result<(), SurfaceError>;

    /// Capture the full current raster.
    fn snapshot(&self) -> Result<Snapshot, SurfaceError>;

    /// Replace the current raster with a previously captured snapshot.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError>;
}
