use serde::Deserialize;

use crate::renderer::surface::{GlyphStyle, StrokeStyle};

/// Configuration for a practice session.
///
/// Every field has a default, so a JSON override only needs to name the
/// values it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PracticeConfig {
    /// Upper bound on canvas bitmap width in pixels (default: 600).
    pub canvas_max_width: f32,
    /// Fixed canvas bitmap height in pixels (default: 300).
    pub canvas_height: f32,
    /// How the tracing guide glyph is drawn.
    pub glyph: GlyphStyle,
    /// How user strokes are drawn.
    pub stroke: StrokeStyle,
    /// Key names used in the persistence substrate.
    pub storage: StorageKeys,
    /// Pronunciation clip location and speech fallback settings.
    pub sound: SoundConfig,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            canvas_max_width: 600.0,
            canvas_height: 300.0,
            glyph: GlyphStyle::default(),
            stroke: StrokeStyle::default(),
            storage: StorageKeys::default(),
            sound: SoundConfig::default(),
        }
    }
}

impl PracticeConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Key names in the key-value substrate.
///
/// The keys are global rather than per character, so selecting a new
/// character always overwrites them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageKeys {
    /// JSON array of encoded snapshots.
    pub history: String,
    /// Decimal cursor into the history array.
    pub cursor: String,
    /// The glyph selected when the page was last used.
    pub character: String,
    /// The character set that was active.
    pub set: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            history: "strokeHistory".into(),
            cursor: "historyIndex".into(),
            character: "selectedCharacter".into(),
            set: "selectedSet".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SoundConfig {
    /// URL prefix for pre-recorded clips (default: "/sounds/").
    pub path_prefix: String,
    /// Clip file extension without the dot (default: "mp3").
    pub extension: String,
    /// BCP 47 language tag for the speech fallback (default: "ja-JP").
    pub lang: String,
    pub rate: f32,
    pub volume: f32,
    /// Delay after a clip starts before playback counts as finished.
    pub settle_ms: u32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/sounds/".into(),
            extension: "mp3".into(),
            lang: "ja-JP".into(),
            rate: 1.0,
            volume: 1.0,
            settle_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_layout() {
        let config = PracticeConfig::default();
        assert_eq!(config.canvas_max_width, 600.0);
        assert_eq!(config.canvas_height, 300.0);
        assert_eq!(config.storage.history, "strokeHistory");
        assert_eq!(config.storage.cursor, "historyIndex");
        assert_eq!(config.glyph.font, "80px Arial");
        assert_eq!(config.glyph.origin, [20.0, 120.0]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "canvasHeight": 400,
            "sound": { "lang": "ja" }
        }"#;
        let config = PracticeConfig::from_json(json).unwrap();
        assert_eq!(config.canvas_height, 400.0);
        assert_eq!(config.canvas_max_width, 600.0);
        assert_eq!(config.sound.lang, "ja");
        assert_eq!(config.sound.extension, "mp3");
        assert_eq!(config.sound.settle_ms, 1000);
    }
}
