//! Browser bindings for the kana practice canvas.
//!
//! The page calls `practice_init` once with the id of its `<canvas>`, then
//! forwards DOM events to the `practice_*` exports below.

mod audio;
mod canvas;
mod storage;
pub mod runner;

use std::cell::RefCell;

use kana_core::{CaptureOutcome, PracticeConfig};
use wasm_bindgen::prelude::*;

pub use canvas::{CanvasSurface, WebError};
pub use runner::PracticeRunner;
pub use storage::BrowserStore;

thread_local! {
    static RUNNER: RefCell<Option<PracticeRunner>> = RefCell::new(None);
}

/// Run `f` against the page's runner. Returns `None` before `practice_init`.
fn with_runner<R>(f: impl FnOnce(&mut PracticeRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("practice: not initialized, call practice_init() first");
                None
            }
        }
    })
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.alert_with_message(message) {
            log::warn!("practice: alert failed: {e:?}");
        }
    }
}

fn changed(outcome: CaptureOutcome) -> bool {
    !matches!(outcome, CaptureOutcome::Ignored | CaptureOutcome::Failed)
}

// ---- Lifecycle ----

/// Attach to the canvas with id `canvas_id`. `config_json` overrides the
/// default [`PracticeConfig`] field by field.
#[wasm_bindgen]
pub fn practice_init(canvas_id: &str, config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json.as_deref() {
        Some(json) => PracticeConfig::from_json(json).map_err(to_js)?,
        None => PracticeConfig::default(),
    };
    let surface = CanvasSurface::from_element_id(canvas_id).map_err(to_js)?;
    let mut runner = PracticeRunner::new(surface, BrowserStore::open(), config).map_err(to_js)?;
    let loaded = runner.init().map_err(to_js)?;

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("practice: initialized on #{canvas_id} ({loaded:?})");
    Ok(())
}

/// Re-fit the canvas to its parent; call from the window `resize` handler.
#[wasm_bindgen]
pub fn practice_resize() -> Result<(), JsValue> {
    with_runner(|r| r.fit().map(|_| ()).map_err(to_js)).unwrap_or(Ok(()))
}

// ---- Character selection ----

#[wasm_bindgen]
pub fn practice_select_set(name: &str) -> Result<(), JsValue> {
    with_runner(|r| r.session_mut().select_set_named(name).map_err(to_js)).unwrap_or(Ok(()))
}

#[wasm_bindgen]
pub fn practice_select_character(glyph: &str) -> Result<(), JsValue> {
    with_runner(|r| r.session_mut().select_character(glyph).map_err(to_js)).unwrap_or(Ok(()))
}

/// Glyphs of the active set, in table order.
#[wasm_bindgen]
pub fn practice_characters() -> js_sys::Array {
    with_runner(|r| {
        r.session()
            .characters()
            .iter()
            .map(|glyph| JsValue::from_str(glyph))
            .collect::<js_sys::Array>()
    })
    .unwrap_or_else(js_sys::Array::new)
}

#[wasm_bindgen]
pub fn practice_set() -> Option<String> {
    with_runner(|r| r.session().set().id().to_string())
}

#[wasm_bindgen]
pub fn practice_selected() -> Option<String> {
    with_runner(|r| r.session().selected().map(str::to_string)).flatten()
}

#[wasm_bindgen]
pub fn practice_translation_hindi() -> Option<String> {
    with_runner(|r| r.session().translation().map(|t| t.hindi.clone())).flatten()
}

#[wasm_bindgen]
pub fn practice_translation_english() -> Option<String> {
    with_runner(|r| r.session().translation().map(|t| t.english.clone())).flatten()
}

// ---- Pointer input (client coordinates) ----

#[wasm_bindgen]
pub fn practice_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.pointer_down(x, y));
}

#[wasm_bindgen]
pub fn practice_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.pointer_move(x, y));
}

#[wasm_bindgen]
pub fn practice_pointer_up() {
    with_runner(|r| r.pointer_up());
}

#[wasm_bindgen]
pub fn practice_pointer_leave() {
    with_runner(|r| r.pointer_leave());
}

// ---- History ----

/// Returns `true` when the canvas changed.
#[wasm_bindgen]
pub fn practice_undo() -> bool {
    with_runner(|r| changed(r.undo())).unwrap_or(false)
}

/// Returns `true` when the canvas changed.
#[wasm_bindgen]
pub fn practice_redo() -> bool {
    with_runner(|r| changed(r.redo())).unwrap_or(false)
}

#[wasm_bindgen]
pub fn practice_can_undo() -> bool {
    with_runner(|r| r.session().can_undo()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn practice_can_redo() -> bool {
    with_runner(|r| r.session().can_redo()).unwrap_or(false)
}

// ---- Pronunciation ----

/// Pronounce the selected glyph. The returned promise resolves once playback
/// has fully completed; while it is pending `practice_sound_playing` is true.
#[wasm_bindgen]
pub async fn practice_play_sound() {
    let Some(request) = with_runner(|r| r.begin_pronunciation()).flatten() else {
        return;
    };
    let outcome = audio::play_pronunciation(&request).await;
    if let Some(notice) = with_runner(|r| r.finish_pronunciation(outcome)).flatten() {
        alert(notice);
    }
}

#[wasm_bindgen]
pub fn practice_sound_playing() -> bool {
    with_runner(|r| r.session().pronunciation().is_playing()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn practice_sound_label() -> String {
    with_runner(|r| r.session().pronunciation().button_label())
        .unwrap_or("Play Sound")
        .to_string()
}
