use glam::Vec2;
use thiserror::Error;

use crate::api::config::PracticeConfig;
use crate::audio::pronunciation::{PlaybackOutcome, PronunciationGate, PronunciationRequest};
use crate::capture::stroke::{CaptureOutcome, StrokeCapture};
use crate::catalog::mapping::{CharacterMapping, Translation};
use crate::catalog::sets::{CharacterSet, UnknownSet};
use crate::history::store::{HistoryError, HistoryStore, LoadOutcome};
use crate::input::viewport::{fit_canvas, CanvasViewport};
use crate::persist::store::KeyValueStore;
use crate::renderer::surface::{RenderSurface, SurfaceError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("`{0}` is not in any character set")]
    UnknownGlyph(String),
    #[error(transparent)]
    UnknownSet(#[from] UnknownSet),
    #[error("failed to load character mapping: {0}")]
    Mapping(#[from] serde_json::Error),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// One practice page: catalog selection, the drawing canvas with its
/// timeline, and the pronunciation button.
///
/// Pointer positions come in as client coordinates and are mapped into
/// bitmap space before they reach the [`StrokeCapture`] controller.
pub struct PracticeSession<R: RenderSurface, S: KeyValueStore> {
    config: PracticeConfig,
    capture: StrokeCapture<R, S>,
    viewport: CanvasViewport,
    set: CharacterSet,
    mapping: CharacterMapping,
    pronunciation: PronunciationGate,
}

impl<R: RenderSurface, S: KeyValueStore> PracticeSession<R, S> {
    /// Create a session using the bundled character mapping.
    pub fn new(surface: R, store: S, config: PracticeConfig) -> Result<Self, SessionError> {
        let mapping = CharacterMapping::bundled()?;
        Ok(Self::with_mapping(surface, store, config, mapping))
    }

    pub fn with_mapping(
        surface: R,
        store: S,
        config: PracticeConfig,
        mapping: CharacterMapping,
    ) -> Self {
        let viewport = CanvasViewport::new(surface.bitmap_size());
        let history = HistoryStore::new(store, &config.storage);
        let capture = StrokeCapture::new(
            surface,
            history,
            config.glyph.clone(),
            config.stroke.clone(),
        );
        Self {
            config,
            capture,
            viewport,
            set: CharacterSet::default(),
            mapping,
            pronunciation: PronunciationGate::new(),
        }
    }

    // -- Selection --

    /// Switch the character grid. The timeline and selection are untouched.
    pub fn select_set(&mut self, set: CharacterSet) {
        if set != self.set {
            log::info!("session: showing {}", set.label());
        }
        self.set = set;
        self.save_selection();
    }

    pub fn select_set_named(&mut self, name: &str) -> Result<(), SessionError> {
        let set = name.parse::<CharacterSet>()?;
        self.select_set(set);
        Ok(())
    }

    /// Select a glyph to practise: reseeds the canvas and starts a fresh
    /// timeline. The glyph's set becomes the active set.
    ///
    /// Re-selecting the glyph already shown is not a change and keeps its
    /// timeline.
    pub fn select_character(&mut self, glyph: &str) -> Result<(), SessionError> {
        let set = CharacterSet::of(glyph)
            .ok_or_else(|| SessionError::UnknownGlyph(glyph.to_string()))?;
        if self.selected() == Some(glyph) {
            if set != self.set {
                self.select_set(set);
            }
            return Ok(());
        }
        log::info!("session: selected `{glyph}`");
        self.set = set;
        let seeded = self.capture.select_glyph(glyph);
        self.save_selection();
        seeded?;
        Ok(())
    }

    /// Pick up where a previous page load left off: the persisted set,
    /// glyph and timeline. Anything unreadable falls back to defaults.
    pub fn resume(&mut self) -> Result<LoadOutcome, SessionError> {
        let keys = self.config.storage.clone();
        let store = self.capture.history().store();

        match read_key(store, &keys.set).map(|name| name.parse::<CharacterSet>()) {
            Some(Ok(set)) => self.set = set,
            Some(Err(err)) => log::warn!("session: ignoring persisted set: {err}"),
            None => {}
        }

        let glyph = read_key(store, &keys.character)
            .filter(|glyph| CharacterSet::of(glyph).is_some());
        if let Some(glyph) = &glyph {
            log::info!("session: resuming `{glyph}`");
        }

        let loaded = self.capture.resume_glyph(glyph.as_deref())?;
        Ok(loaded)
    }

    pub fn set(&self) -> CharacterSet {
        self.set
    }

    /// Glyphs of the active set, in grid order.
    pub fn characters(&self) -> &'static [&'static str] {
        self.set.glyphs()
    }

    pub fn selected(&self) -> Option<&str> {
        self.capture.glyph()
    }

    /// Translation text for the selected glyph.
    pub fn translation(&self) -> Option<&Translation> {
        self.selected().and_then(|glyph| self.mapping.get(glyph))
    }

    // -- Canvas --

    /// Update where the canvas element sits on screen.
    pub fn set_display_rect(&mut self, origin: Vec2, size: Vec2) {
        self.viewport.set_display_rect(origin, size);
    }

    /// Fit the canvas to its parent and redraw. Strokes are preserved and the
    /// timeline is not modified. Returns the new bitmap size.
    pub fn resize(&mut self, parent_width: f32) -> Result<Vec2, SessionError> {
        let size = fit_canvas(parent_width, &self.config);
        self.viewport.bitmap = size;
        self.viewport.display = size;
        self.capture.resize(size)?;
        Ok(size)
    }

    pub fn pointer_down(&mut self, client: Vec2) -> CaptureOutcome {
        let at = self.viewport.to_bitmap(client);
        self.capture.on_pointer_down(at)
    }

    pub fn pointer_move(&mut self, client: Vec2) -> CaptureOutcome {
        let to = self.viewport.to_bitmap(client);
        self.capture.on_pointer_move(to)
    }

    pub fn pointer_up(&mut self) -> CaptureOutcome {
        self.capture.on_pointer_up()
    }

    pub fn pointer_leave(&mut self) -> CaptureOutcome {
        self.capture.on_pointer_leave()
    }

    pub fn undo(&mut self) -> CaptureOutcome {
        self.capture.on_undo()
    }

    pub fn redo(&mut self) -> CaptureOutcome {
        self.capture.on_redo()
    }

    pub fn can_undo(&self) -> bool {
        self.capture.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.capture.can_redo()
    }

    /// The most recent persistence failure, if any.
    pub fn take_persist_warning(&mut self) -> Option<HistoryError> {
        self.capture.history_mut().take_warning()
    }

    pub fn capture(&self) -> &StrokeCapture<R, S> {
        &self.capture
    }

    pub fn viewport(&self) -> &CanvasViewport {
        &self.viewport
    }

    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    // -- Pronunciation --

    pub fn begin_pronunciation(&mut self) -> Option<PronunciationRequest> {
        self.pronunciation
            .begin(self.capture.glyph(), &self.config.sound)
    }

    pub fn finish_pronunciation(&mut self, outcome: PlaybackOutcome) -> Option<&'static str> {
        self.pronunciation.finish(outcome)
    }

    pub fn pronunciation(&self) -> &PronunciationGate {
        &self.pronunciation
    }

    pub fn into_parts(self) -> (R, S) {
        let (surface, history) = self.capture.into_parts();
        (surface, history.into_store())
    }

    fn save_selection(&mut self) {
        let keys = &self.config.storage;
        let glyph = self.capture.glyph().map(str::to_string);
        let store = self.capture.history_mut().store_mut();

        let result = store
            .set(&keys.set, self.set.id())
            .and_then(|()| match glyph {
                Some(glyph) => store.set(&keys.character, &glyph),
                None => Ok(()),
            });
        if let Err(err) = result {
            log::warn!("session: selection not persisted: {err}");
        }
    }
}

fn read_key<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("session: cannot read `{key}`: {err}");
            None
        }
    }
}
