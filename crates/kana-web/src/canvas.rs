use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use kana_core::{GlyphStyle, RenderSurface, Snapshot, StrokeStyle, SurfaceError};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

#[derive(Debug, Error)]
pub enum WebError {
    #[error("no global `window`")]
    NoWindow,
    #[error("no element with id `{0}`")]
    MissingElement(String),
    #[error("element `{0}` is not a <canvas>")]
    NotACanvas(String),
}

/// Counts whole-frame replacements (clear, resize, restore). A restore
/// whose image decodes after a newer replacement is stale and is dropped.
#[derive(Debug, Clone, Default)]
struct FrameCounter(Rc<Cell<u64>>);

impl FrameCounter {
    fn advance(&self) -> u64 {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        next
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.get() == ticket
    }
}

/// [`RenderSurface`] over an `HtmlCanvasElement` 2D context.
///
/// The context is looked up on every call; if it cannot be acquired the
/// single operation fails with [`SurfaceError::Unavailable`].
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    frames: FrameCounter,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self {
            canvas,
            frames: FrameCounter::default(),
        }
    }

    pub fn from_element_id(id: &str) -> Result<Self, WebError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(WebError::NoWindow)?;
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| WebError::MissingElement(id.to_string()))?;
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| WebError::NotACanvas(id.to_string()))?;
        Ok(Self::new(canvas))
    }

    /// Width available in the canvas' parent element, in CSS pixels.
    pub fn parent_width(&self) -> Option<f32> {
        self.canvas
            .parent_element()
            .map(|parent| parent.client_width() as f32)
    }

    /// On-screen origin and size of the element (`getBoundingClientRect`).
    pub fn display_rect(&self) -> (Vec2, Vec2) {
        let rect = self.canvas.get_bounding_client_rect();
        (
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
        )
    }

    fn context(&self) -> Result<CanvasRenderingContext2d, SurfaceError> {
        self.canvas
            .get_context("2d")
            .map_err(|e| SurfaceError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| SurfaceError::Unavailable("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Unavailable("context is not 2d".into()))
    }
}

impl RenderSurface for CanvasSurface {
    fn bitmap_size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn resize(&mut self, size: Vec2) {
        self.frames.advance();
        self.canvas.set_width(size.x as u32);
        self.canvas.set_height(size.y as u32);
        let style = self.canvas.style();
        for (prop, px) in [("width", size.x), ("height", size.y)] {
            if let Err(e) = style.set_property(prop, &format!("{px}px")) {
                log::warn!("canvas: cannot set style {prop}: {e:?}");
            }
        }
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        self.frames.advance();
        let size = self.bitmap_size();
        ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: &str, style: &GlyphStyle) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.set_font(&style.font);
        ctx.set_fill_style_str(&style.fill);
        ctx.fill_text(glyph, style.origin[0] as f64, style.origin[1] as f64)
            .map_err(|e| SurfaceError::Unavailable(format!("fillText: {e:?}")))
    }

    fn begin_path(&mut self, at: Vec2) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.begin_path();
        ctx.move_to(at.x as f64, at.y as f64);
        Ok(())
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, style: &StrokeStyle) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.set_stroke_style_str(&style.color);
        ctx.set_line_width(style.line_width as f64);
        ctx.stroke();
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot, SurfaceError> {
        self.canvas
            .to_data_url()
            .map(Snapshot::new)
            .map_err(|e| SurfaceError::Capture(format!("{e:?}")))
    }

    /// Decoding a data URL is asynchronous in the browser: the pixels are
    /// replaced when the image's `load` event fires, unless another frame
    /// replacement happened first.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        let ctx = self.context()?;
        let size = self.bitmap_size();
        let image = HtmlImageElement::new()
            .map_err(|e| SurfaceError::Restore(format!("{e:?}")))?;

        let ticket = self.frames.advance();
        let frames = self.frames.clone();
        let loaded = image.clone();
        let onload = Closure::once_into_js(move || {
            if !frames.is_current(ticket) {
                log::debug!("canvas: dropping stale restore {ticket}");
                return;
            }
            ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
            if let Err(e) = ctx.draw_image_with_html_image_element(&loaded, 0.0, 0.0) {
                log::warn!("canvas: drawImage failed: {e:?}");
            }
        });
        image.set_onload(Some(onload.unchecked_ref()));
        image.set_src(snapshot.as_str());
        Ok(())
    }
}
