use std::collections::HashMap;
use serde::{Deserialize, Serialize};

const BUNDLED: &str = include_str!("../../data/character_mapping.json");

/// Auxiliary display text shown next to the canvas for a glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Devanagari transliteration.
    pub hindi: String,
    /// Romaji reading.
    pub english: String,
}

/// Glyph → translation lookup, loaded from JSON of the form
/// `{ "あ": { "hindi": "अ", "english": "a" }, ... }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterMapping {
    entries: HashMap<String, Translation>,
}

impl CharacterMapping {
    /// Parse a mapping from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The mapping shipped with the crate, covering hiragana and katakana.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(BUNDLED)
    }

    pub fn get(&self, glyph: &str) -> Option<&Translation> {
        self.entries.get(glyph)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sets::CharacterSet;

    #[test]
    fn bundled_covers_both_sets() {
        let mapping = CharacterMapping::bundled().unwrap();
        for set in CharacterSet::ALL {
            for glyph in set.glyphs() {
                assert!(mapping.get(glyph).is_some(), "missing {glyph}");
            }
        }
        assert_eq!(mapping.len(), 92);
    }

    #[test]
    fn readings_agree_across_sets() {
        let mapping = CharacterMapping::bundled().unwrap();
        let shi = mapping.get("し").unwrap();
        assert_eq!(shi.english, "shi");
        assert_eq!(mapping.get("シ"), Some(shi));
    }

    #[test]
    fn parse_custom_mapping() {
        let json = r#"{ "あ": { "hindi": "अ", "english": "a" } }"#;
        let mapping = CharacterMapping::from_json(json).unwrap();
        assert_eq!(mapping.get("あ").unwrap().hindi, "अ");
        assert_eq!(mapping.get("い"), None);
    }

    #[test]
    fn missing_field_is_an_error() {
        let json = r#"{ "あ": { "hindi": "अ" } }"#;
        assert!(CharacterMapping::from_json(json).is_err());
    }
}
