use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The 46 base hiragana in gojūon order.
pub const HIRAGANA: [&str; 46] = [
    "あ", "い", "う", "え", "お",
    "か", "き", "く", "け", "こ",
    "さ", "し", "す", "せ", "そ",
    "た", "ち", "つ", "て", "と",
    "な", "に", "ぬ", "ね", "の",
    "は", "ひ", "ふ", "へ", "ほ",
    "ま", "み", "む", "め", "も",
    "や", "ゆ", "よ",
    "ら", "り", "る", "れ", "ろ",
    "わ", "を", "ん",
];

/// The 46 base katakana, index-aligned with [`HIRAGANA`].
pub const KATAKANA: [&str; 46] = [
    "ア", "イ", "ウ", "エ", "オ",
    "カ", "キ", "ク", "ケ", "コ",
    "サ", "シ", "ス", "セ", "ソ",
    "タ", "チ", "ツ", "テ", "ト",
    "ナ", "ニ", "ヌ", "ネ", "ノ",
    "ハ", "ヒ", "フ", "ヘ", "ホ",
    "マ", "ミ", "ム", "メ", "モ",
    "ヤ", "ユ", "ヨ",
    "ラ", "リ", "ル", "レ", "ロ",
    "ワ", "ヲ", "ン",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown character set `{0}` (expected `hiragana` or `katakana`)")]
pub struct UnknownSet(pub String);

/// Which syllabary the character grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterSet {
    #[default]
    Hiragana,
    Katakana,
}

impl CharacterSet {
    pub const ALL: [CharacterSet; 2] = [CharacterSet::Hiragana, CharacterSet::Katakana];

    /// Selectable glyphs, in display order.
    pub fn glyphs(self) -> &'static [&'static str] {
        match self {
            CharacterSet::Hiragana => &HIRAGANA,
            CharacterSet::Katakana => &KATAKANA,
        }
    }

    pub fn contains(self, glyph: &str) -> bool {
        self.glyphs().contains(&glyph)
    }

    /// The set a glyph belongs to, if any.
    pub fn of(glyph: &str) -> Option<CharacterSet> {
        Self::ALL.into_iter().find(|set| set.contains(glyph))
    }

    /// Stable lowercase identifier, used for persistence and `FromStr`.
    pub fn id(self) -> &'static str {
        match self {
            CharacterSet::Hiragana => "hiragana",
            CharacterSet::Katakana => "katakana",
        }
    }

    /// Human-readable name for headings and the set selector.
    pub fn label(self) -> &'static str {
        match self {
            CharacterSet::Hiragana => "Hiragana",
            CharacterSet::Katakana => "Katakana",
        }
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CharacterSet {
    type Err = UnknownSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hiragana" => Ok(CharacterSet::Hiragana),
            "katakana" => Ok(CharacterSet::Katakana),
            _ => Err(UnknownSet(s.to_string())),
        }
    }
}
