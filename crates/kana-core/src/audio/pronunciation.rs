use crate::api::config::SoundConfig;

/// Shown when neither the clip nor speech synthesis could play.
pub const UNSUPPORTED_NOTICE: &str = "Your browser does not support text-to-speech.";

/// How a pronunciation request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The pre-recorded clip played.
    Played,
    /// The clip failed and speech synthesis spoke the glyph instead.
    PlayedViaFallback,
    /// Neither the clip nor speech synthesis was available.
    Unsupported,
}

impl PlaybackOutcome {
    /// User-visible notice for this outcome, if one is required.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            PlaybackOutcome::Unsupported => Some(UNSUPPORTED_NOTICE),
            _ => None,
        }
    }
}

/// Everything a player needs to pronounce one glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct PronunciationRequest {
    pub glyph: String,
    /// URL of the pre-recorded clip.
    pub clip_url: String,
    /// Speech fallback language tag.
    pub lang: String,
    pub rate: f32,
    pub volume: f32,
    /// How long after the clip starts playback counts as finished.
    pub settle_ms: u32,
}

impl PronunciationRequest {
    pub fn for_glyph(glyph: &str, config: &SoundConfig) -> Self {
        Self {
            glyph: glyph.to_string(),
            clip_url: format!("{}{}.{}", config.path_prefix, glyph, config.extension),
            lang: config.lang.clone(),
            rate: config.rate,
            volume: config.volume,
            settle_ms: config.settle_ms,
        }
    }
}

/// Tracks whether a pronunciation is in flight, which disables the play
/// button.
///
/// "Done" means fully completed: the flag stays set until the player
/// reports an outcome, which for the speech fallback is the utterance's end
/// event. Selecting another character does not cancel or clear it.
#[derive(Debug, Default)]
pub struct PronunciationGate {
    playing: Option<String>,
}

impl PronunciationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playback for `selected`. Returns `None` when nothing is
    /// selected or a previous request has not finished.
    pub fn begin(&mut self, selected: Option<&str>, config: &SoundConfig) -> Option<PronunciationRequest> {
        let glyph = selected?;
        if self.playing.is_some() {
            return None;
        }
        self.playing = Some(glyph.to_string());
        Some(PronunciationRequest::for_glyph(glyph, config))
    }

    /// Record the outcome of the in-flight request and re-enable playback.
    /// Returns the notice to show, if any.
    pub fn finish(&mut self, outcome: PlaybackOutcome) -> Option<&'static str> {
        match self.playing.take() {
            Some(glyph) => log::debug!("pronunciation of `{glyph}` finished: {outcome:?}"),
            None => log::warn!("pronunciation finished with nothing in flight: {outcome:?}"),
        }
        outcome.notice()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    /// Label for the play button.
    pub fn button_label(&self) -> &'static str {
        if self.is_playing() {
            "Playing..."
        } else {
            "Play Sound"
        }
    }
}
