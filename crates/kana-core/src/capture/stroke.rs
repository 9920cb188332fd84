use glam::Vec2;

use crate::api::types::Frame;
use crate::history::store::{HistoryStore, LoadOutcome};
use crate::input::events::CaptureEvent;
use crate::persist::store::KeyValueStore;
use crate::renderer::surface::{GlyphStyle, RenderSurface, StrokeStyle, SurfaceError};

/// Whether a stroke is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureState {
    /// Waiting for the user to start drawing.
    Idle,
    /// A stroke is being drawn; `last` is the previous pointer position.
    Drawing { last: Vec2 },
}

/// Result of feeding one event to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Pointer down accepted, a new path was started.
    StrokeStarted,
    /// A live segment was rendered.
    SegmentDrawn,
    /// The stroke ended and a snapshot was committed.
    Committed,
    /// The canvas moved one step back in history.
    Undone,
    /// The canvas moved one step forward in history.
    Redone,
    /// No effect: wrong state or at a history boundary.
    Ignored,
    /// The rendering surface failed; the operation was abandoned and the
    /// timeline left as it was.
    Failed,
}

/// Turns pointer input into rendered strokes and timeline commits.
///
/// Owns the surface and the [`HistoryStore`]. Two states only: `Idle` and
/// `Drawing`. Every input goes through [`StrokeCapture::handle`].
pub struct StrokeCapture<R: RenderSurface, S: KeyValueStore> {
    surface: R,
    history: HistoryStore<S>,
    glyph: Option<String>,
    glyph_style: GlyphStyle,
    stroke_style: StrokeStyle,
    state: CaptureState,
}

impl<R: RenderSurface, S: KeyValueStore> StrokeCapture<R, S> {
    pub fn new(
        surface: R,
        history: HistoryStore<S>,
        glyph_style: GlyphStyle,
        stroke_style: StrokeStyle,
    ) -> Self {
        Self {
            surface,
            history,
            glyph: None,
            glyph_style,
            stroke_style,
            state: CaptureState::Idle,
        }
    }

    /// The single transition function.
    pub fn handle(&mut self, event: CaptureEvent) -> CaptureOutcome {
        let outcome = match (self.state, event) {
            (CaptureState::Idle, CaptureEvent::PointerDown(at)) => self.begin_stroke(at),
            (CaptureState::Drawing { last }, CaptureEvent::PointerMove(to)) => {
                self.extend_stroke(last, to)
            }
            (CaptureState::Drawing { .. }, CaptureEvent::PointerUp | CaptureEvent::PointerLeave) => {
                self.finish_stroke()
            }
            (CaptureState::Idle, CaptureEvent::Undo) => self.step_back(),
            (CaptureState::Idle, CaptureEvent::Redo) => self.step_forward(),
            // Stray moves/ups while idle, a second pointer down, or history
            // navigation mid-stroke.
            _ => CaptureOutcome::Ignored,
        };
        log::trace!("capture: {event:?} -> {outcome:?} ({:?})", self.state);
        outcome
    }

    pub fn on_pointer_down(&mut self, at: Vec2) -> CaptureOutcome {
        self.handle(CaptureEvent::PointerDown(at))
    }

    pub fn on_pointer_move(&mut self, to: Vec2) -> CaptureOutcome {
        self.handle(CaptureEvent::PointerMove(to))
    }

    pub fn on_pointer_up(&mut self) -> CaptureOutcome {
        self.handle(CaptureEvent::PointerUp)
    }

    pub fn on_pointer_leave(&mut self) -> CaptureOutcome {
        self.handle(CaptureEvent::PointerLeave)
    }

    pub fn on_undo(&mut self) -> CaptureOutcome {
        self.handle(CaptureEvent::Undo)
    }

    pub fn on_redo(&mut self) -> CaptureOutcome {
        self.handle(CaptureEvent::Redo)
    }

    /// Switch to a new character: abandon any stroke, reseed the canvas and
    /// start an empty timeline (overwriting whatever was persisted).
    ///
    /// The timeline is reset even if the surface fails to draw the seed.
    pub fn select_glyph(&mut self, glyph: &str) -> Result<(), SurfaceError> {
        if self.is_drawing() {
            log::debug!("capture: abandoning stroke in progress");
        }
        self.state = CaptureState::Idle;
        self.glyph = Some(glyph.to_string());
        self.history.reset();
        self.render(Frame::Seeded)
    }

    /// Reseed `glyph` and pick up the persisted timeline instead of resetting
    /// it. Used when the page reloads mid-session.
    ///
    /// With no glyph there is nothing a timeline could belong to, so any
    /// persisted one is discarded.
    pub fn resume_glyph(&mut self, glyph: Option<&str>) -> Result<LoadOutcome, SurfaceError> {
        self.state = CaptureState::Idle;
        self.glyph = glyph.map(str::to_string);
        let loaded = match glyph {
            Some(_) => self.history.load(),
            None => {
                self.history.reset();
                LoadOutcome::Reset
            }
        };
        self.redraw_current()?;
        Ok(loaded)
    }

    /// Change the bitmap size. The surface loses its pixels, so the current
    /// frame is drawn again. The timeline is never touched.
    pub fn resize(&mut self, size: Vec2) -> Result<(), SurfaceError> {
        self.surface.resize(size);
        self.redraw_current()
    }

    /// Render the seed glyph and the current timeline frame.
    pub fn redraw_current(&mut self) -> Result<(), SurfaceError> {
        let frame = self.history.current();
        render_frame(&mut self.surface, self.glyph.as_deref(), &self.glyph_style, frame)
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, CaptureState::Drawing { .. })
    }

    pub fn glyph(&self) -> Option<&str> {
        self.glyph.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        !self.is_drawing() && self.history.timeline().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_drawing() && self.history.timeline().can_redo()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore<S> {
        &mut self.history
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn into_parts(self) -> (R, HistoryStore<S>) {
        (self.surface, self.history)
    }

    fn begin_stroke(&mut self, at: Vec2) -> CaptureOutcome {
        if let Err(err) = self.surface.begin_path(at) {
            log::warn!("capture: cannot start stroke: {err}");
            return CaptureOutcome::Failed;
        }
        self.state = CaptureState::Drawing { last: at };
        CaptureOutcome::StrokeStarted
    }

    fn extend_stroke(&mut self, last: Vec2, to: Vec2) -> CaptureOutcome {
        if let Err(err) = self.surface.draw_line(last, to, &self.stroke_style) {
            log::warn!("capture: segment dropped: {err}");
            return CaptureOutcome::Failed;
        }
        self.state = CaptureState::Drawing { last: to };
        CaptureOutcome::SegmentDrawn
    }

    fn finish_stroke(&mut self) -> CaptureOutcome {
        self.state = CaptureState::Idle;
        match self.surface.snapshot() {
            Ok(snapshot) => {
                self.history.commit(snapshot);
                CaptureOutcome::Committed
            }
            Err(err) => {
                log::warn!("capture: stroke not recorded: {err}");
                CaptureOutcome::Failed
            }
        }
    }

    // Render the target frame first and only move the cursor once the
    // canvas actually shows it.
    fn step_back(&mut self) -> CaptureOutcome {
        let Some(frame) = self.history.peek_undo() else {
            return CaptureOutcome::Ignored;
        };
        if let Err(err) = render_frame(&mut self.surface, self.glyph.as_deref(), &self.glyph_style, frame) {
            log::warn!("capture: undo abandoned: {err}");
            return CaptureOutcome::Failed;
        }
        self.history.undo();
        CaptureOutcome::Undone
    }

    fn step_forward(&mut self) -> CaptureOutcome {
        let Some(snapshot) = self.history.peek_redo() else {
            return CaptureOutcome::Ignored;
        };
        if let Err(err) = self.surface.restore(snapshot) {
            log::warn!("capture: redo abandoned: {err}");
            return CaptureOutcome::Failed;
        }
        self.history.redo();
        CaptureOutcome::Redone
    }

    fn render(&mut self, frame: Frame<'_>) -> Result<(), SurfaceError> {
        render_frame(&mut self.surface, self.glyph.as_deref(), &self.glyph_style, frame)
    }
}

/// Draw `frame` on `surface`. The seeded frame is the glyph alone on a clear
/// canvas; snapshots already contain the glyph.
fn render_frame<R: RenderSurface>(
    surface: &mut R,
    glyph: Option<&str>,
    style: &GlyphStyle,
    frame: Frame<'_>,
) -> Result<(), SurfaceError> {
    match frame {
        Frame::Seeded => {
            surface.clear()?;
            if let Some(glyph) = glyph {
                surface.draw_glyph(glyph, style)?;
            }
            Ok(())
        }
        Frame::Snapshot(snapshot) => surface.restore(snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::StorageKeys;
    use crate::api::types::Snapshot;
    use crate::persist::store::MemoryStore;
    use crate::testing::FakeSurface;

    type Capture = StrokeCapture<FakeSurface, MemoryStore>;

    fn capture() -> Capture {
        StrokeCapture::new(
            FakeSurface::new(600.0, 300.0),
            HistoryStore::new(MemoryStore::new(), &StorageKeys::default()),
            GlyphStyle::default(),
            StrokeStyle::default(),
        )
    }

    fn draw_stroke(c: &mut Capture, from: Vec2, to: Vec2) -> Snapshot {
        assert_eq!(c.on_pointer_down(from), CaptureOutcome::StrokeStarted);
        assert_eq!(c.on_pointer_move(to), CaptureOutcome::SegmentDrawn);
        assert_eq!(c.on_pointer_up(), CaptureOutcome::Committed);
        c.surface().displayed()
    }

    fn seeded(glyph: &str) -> Snapshot {
        Snapshot::new(format!("data:fake,glyph:{glyph}"))
    }

    #[test]
    fn stroke_lifecycle() {
        let mut c = capture();
        c.select_glyph("あ").unwrap();
        assert_eq!(c.state(), CaptureState::Idle);

        c.on_pointer_down(Vec2::new(1.0, 1.0));
        assert_eq!(c.state(), CaptureState::Drawing { last: Vec2::new(1.0, 1.0) });
        c.on_pointer_move(Vec2::new(2.0, 3.0));
        assert_eq!(c.state(), CaptureState::Drawing { last: Vec2::new(2.0, 3.0) });
        c.on_pointer_move(Vec2::new(4.0, 5.0));
        assert_eq!(
            c.surface().ops,
            vec!["glyph:あ", "line:1,1->2,3", "line:2,3->4,5"]
        );

        assert_eq!(c.on_pointer_leave(), CaptureOutcome::Committed);
        assert_eq!(c.state(), CaptureState::Idle);
        assert_eq!(c.history().timeline().len(), 1);
        assert_eq!(c.history().timeline().cursor(), 0);
    }

    #[test]
    fn stray_events_are_ignored() {
        let mut c = capture();
        c.select_glyph("い").unwrap();

        assert_eq!(c.on_pointer_move(Vec2::ONE), CaptureOutcome::Ignored);
        assert_eq!(c.on_pointer_up(), CaptureOutcome::Ignored);
        assert_eq!(c.on_pointer_leave(), CaptureOutcome::Ignored);
        assert!(c.history().timeline().is_empty());

        c.on_pointer_down(Vec2::ZERO);
        assert_eq!(c.on_pointer_down(Vec2::ONE), CaptureOutcome::Ignored);
        assert_eq!(c.state(), CaptureState::Drawing { last: Vec2::ZERO });
    }

    #[test]
    fn undo_redo_disabled_while_drawing() {
        let mut c = capture();
        c.select_glyph("う").unwrap();
        draw_stroke(&mut c, Vec2::ZERO, Vec2::ONE);

        c.on_pointer_down(Vec2::new(5.0, 5.0));
        assert!(!c.can_undo());
        assert_eq!(c.on_undo(), CaptureOutcome::Ignored);
        assert_eq!(c.on_redo(), CaptureOutcome::Ignored);
        assert_eq!(c.history().timeline().cursor(), 0);
        assert!(c.is_drawing());
    }

    #[test]
    fn undo_walks_back_to_seeded_glyph_and_redo_returns() {
        let mut c = capture();
        c.select_glyph("あ").unwrap();
        let a = draw_stroke(&mut c, Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        let b = draw_stroke(&mut c, Vec2::new(30.0, 10.0), Vec2::new(30.0, 40.0));
        assert_ne!(a, b);

        assert_eq!(c.on_undo(), CaptureOutcome::Undone);
        assert_eq!(c.surface().displayed(), a);

        assert_eq!(c.on_undo(), CaptureOutcome::Undone);
        assert_eq!(c.surface().displayed(), seeded("あ"));
        assert_eq!(c.history().timeline().cursor(), -1);

        assert_eq!(c.on_undo(), CaptureOutcome::Ignored);

        assert_eq!(c.on_redo(), CaptureOutcome::Redone);
        assert_eq!(c.surface().displayed(), a);
        assert_eq!(c.on_redo(), CaptureOutcome::Redone);
        assert_eq!(c.surface().displayed(), b);
        assert_eq!(c.on_redo(), CaptureOutcome::Ignored);
    }

    #[test]
    fn new_stroke_after_undo_drops_redo_tail() {
        let mut c = capture();
        c.select_glyph("え").unwrap();
        let s0 = draw_stroke(&mut c, Vec2::ZERO, Vec2::new(1.0, 0.0));
        let _s1 = draw_stroke(&mut c, Vec2::ZERO, Vec2::new(2.0, 0.0));
        c.on_undo();
        let s2 = draw_stroke(&mut c, Vec2::ZERO, Vec2::new(3.0, 0.0));

        assert_eq!(c.history().timeline().snapshots(), &[s0, s2]);
        assert!(!c.can_redo());
    }

    #[test]
    fn selecting_mid_stroke_abandons_it() {
        let mut c = capture();
        c.select_glyph("か").unwrap();
        draw_stroke(&mut c, Vec2::ZERO, Vec2::ONE);

        c.on_pointer_down(Vec2::new(5.0, 5.0));
        c.on_pointer_move(Vec2::new(6.0, 6.0));
        c.select_glyph("き").unwrap();

        assert_eq!(c.state(), CaptureState::Idle);
        assert_eq!(c.surface().displayed(), seeded("き"));
        assert!(c.history().timeline().is_empty());
        assert_eq!(c.on_pointer_up(), CaptureOutcome::Ignored);
        assert!(c.history().timeline().is_empty());
    }

    #[test]
    fn surface_failure_leaves_timeline_untouched() {
        let mut c = capture();
        c.select_glyph("さ").unwrap();
        draw_stroke(&mut c, Vec2::ZERO, Vec2::ONE);
        let before = c.history().timeline().clone();

        c.surface_mut().available = false;
        assert_eq!(c.on_undo(), CaptureOutcome::Failed);
        assert_eq!(c.history().timeline(), &before);

        assert_eq!(c.on_pointer_down(Vec2::ZERO), CaptureOutcome::Failed);
        assert_eq!(c.state(), CaptureState::Idle);

        c.surface_mut().available = true;
        c.on_pointer_down(Vec2::ZERO);
        c.surface_mut().available = false;
        assert_eq!(c.on_pointer_up(), CaptureOutcome::Failed);
        assert_eq!(c.state(), CaptureState::Idle);
        assert_eq!(c.history().timeline(), &before);
    }

    #[test]
    fn resize_redraws_current_frame_without_touching_timeline() {
        let mut c = capture();
        c.select_glyph("た").unwrap();
        let a = draw_stroke(&mut c, Vec2::ZERO, Vec2::ONE);
        let before = c.history().timeline().clone();

        c.resize(Vec2::new(320.0, 300.0)).unwrap();
        assert_eq!(c.surface().bitmap_size(), Vec2::new(320.0, 300.0));
        assert_eq!(c.surface().displayed(), a);
        assert_eq!(c.history().timeline(), &before);

        c.on_undo();
        c.resize(Vec2::new(600.0, 300.0)).unwrap();
        assert_eq!(c.surface().displayed(), seeded("た"));
    }

    #[test]
    fn resume_restores_persisted_frame() {
        let mut c = capture();
        c.select_glyph("な").unwrap();
        let a = draw_stroke(&mut c, Vec2::ZERO, Vec2::ONE);
        draw_stroke(&mut c, Vec2::ONE, Vec2::new(2.0, 2.0));
        c.on_undo();

        let store = c.history.into_store();
        let mut reloaded = StrokeCapture::new(
            FakeSurface::new(600.0, 300.0),
            HistoryStore::new(store, &StorageKeys::default()),
            GlyphStyle::default(),
            StrokeStyle::default(),
        );
        assert_eq!(reloaded.resume_glyph(Some("な")).unwrap(), LoadOutcome::Resumed);
        assert_eq!(reloaded.surface().displayed(), a);
        assert_eq!(reloaded.surface().restores, 1);
        assert_eq!(reloaded.history().timeline().cursor(), 0);
        assert!(reloaded.can_redo());
    }

    #[test]
    fn resume_without_glyph_resets_persisted_timeline() {
        let mut c = capture();
        c.select_glyph("の").unwrap();
        draw_stroke(&mut c, Vec2::ZERO, Vec2::ONE);

        let store = c.history.into_store();
        let mut reloaded = StrokeCapture::new(
            FakeSurface::new(600.0, 300.0),
            HistoryStore::new(store, &StorageKeys::default()),
            GlyphStyle::default(),
            StrokeStyle::default(),
        );
        assert_eq!(reloaded.resume_glyph(None).unwrap(), LoadOutcome::Reset);
        assert!(reloaded.history().timeline().is_empty());
        assert!(!reloaded.can_undo());
        assert_eq!(
            reloaded.history().store().get("historyIndex").unwrap().as_deref(),
            Some("-1")
        );
    }
}
