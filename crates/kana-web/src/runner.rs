use glam::Vec2;
use kana_core::{
    CaptureOutcome, LoadOutcome, PlaybackOutcome, PracticeConfig, PracticeSession,
    PronunciationRequest, SessionError,
};

use crate::canvas::CanvasSurface;
use crate::storage::BrowserStore;

/// Owns the single practice session for the page.
///
/// `lib.rs` keeps one of these in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct PracticeRunner {
    session: PracticeSession<CanvasSurface, BrowserStore>,
}

impl PracticeRunner {
    pub fn new(surface: CanvasSurface, store: BrowserStore, config: PracticeConfig) -> Result<Self, SessionError> {
        Ok(Self {
            session: PracticeSession::new(surface, store, config)?,
        })
    }

    /// Restore the previous page state, then fit the canvas to its parent.
    pub fn init(&mut self) -> Result<LoadOutcome, SessionError> {
        let loaded = self.session.resume()?;
        self.fit()?;
        Ok(loaded)
    }

    /// Fit the canvas to its parent element's width.
    pub fn fit(&mut self) -> Result<Vec2, SessionError> {
        let surface = self.session.capture().surface();
        let parent_width = surface
            .parent_width()
            .unwrap_or(self.session.config().canvas_max_width);
        let size = self.session.resize(parent_width)?;
        self.sync_display_rect();
        Ok(size)
    }

    pub fn session(&self) -> &PracticeSession<CanvasSurface, BrowserStore> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PracticeSession<CanvasSurface, BrowserStore> {
        &mut self.session
    }

    // ---- Pointer input, in client coordinates ----

    pub fn pointer_down(&mut self, x: f32, y: f32) -> CaptureOutcome {
        self.sync_display_rect();
        let outcome = self.session.pointer_down(Vec2::new(x, y));
        self.report_persist_warning();
        outcome
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> CaptureOutcome {
        self.session.pointer_move(Vec2::new(x, y))
    }

    pub fn pointer_up(&mut self) -> CaptureOutcome {
        let outcome = self.session.pointer_up();
        self.report_persist_warning();
        outcome
    }

    pub fn pointer_leave(&mut self) -> CaptureOutcome {
        let outcome = self.session.pointer_leave();
        self.report_persist_warning();
        outcome
    }

    pub fn undo(&mut self) -> CaptureOutcome {
        let outcome = self.session.undo();
        self.report_persist_warning();
        outcome
    }

    pub fn redo(&mut self) -> CaptureOutcome {
        let outcome = self.session.redo();
        self.report_persist_warning();
        outcome
    }

    // ---- Pronunciation ----

    pub fn begin_pronunciation(&mut self) -> Option<PronunciationRequest> {
        self.session.begin_pronunciation()
    }

    pub fn finish_pronunciation(&mut self, outcome: PlaybackOutcome) -> Option<&'static str> {
        self.session.finish_pronunciation(outcome)
    }

    // The element can move between events (scrolling, layout changes), so
    // its on-screen rectangle is re-read when a stroke starts.
    fn sync_display_rect(&mut self) {
        let (origin, size) = self.session.capture().surface().display_rect();
        self.session.set_display_rect(origin, size);
    }

    fn report_persist_warning(&mut self) {
        if let Some(warning) = self.session.take_persist_warning() {
            log::warn!("practice: history not saved: {warning}");
        }
    }
}
