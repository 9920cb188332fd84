pub mod api;
pub mod core;
pub mod renderer;
pub mod persist;
pub mod history;
pub mod input;
pub mod capture;
pub mod catalog;
pub mod audio;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience
pub use api::config::{PracticeConfig, SoundConfig, StorageKeys};
pub use api::types::{Frame, Snapshot};
pub use crate::core::session::{PracticeSession, SessionError};
pub use renderer::surface::{GlyphStyle, RenderSurface, StrokeStyle, SurfaceError};
pub use persist::store::{KeyValueStore, MemoryStore, StorageError};
pub use history::timeline::Timeline;
pub use history::store::{HistoryError, HistoryStore, LoadOutcome};
pub use input::events::CaptureEvent;
pub use input::viewport::{fit_canvas, CanvasViewport};
pub use capture::stroke::{CaptureOutcome, CaptureState, StrokeCapture};
pub use catalog::sets::{CharacterSet, UnknownSet, HIRAGANA, KATAKANA};
pub use catalog::mapping::{CharacterMapping, Translation};
pub use audio::pronunciation::{
    PlaybackOutcome, PronunciationGate, PronunciationRequest, UNSUPPORTED_NOTICE,
};
