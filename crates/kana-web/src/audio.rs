use js_sys::{Function, Promise, Reflect};
use kana_core::{PlaybackOutcome, PronunciationRequest};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAudioElement, SpeechSynthesisUtterance};

/// Play the clip for a glyph, falling back to speech synthesis.
///
/// Resolves only once playback has fully completed: after the clip's settle
/// delay, or after the utterance's `end` event.
pub async fn play_pronunciation(request: &PronunciationRequest) -> PlaybackOutcome {
    match play_clip(request).await {
        Ok(()) => PlaybackOutcome::Played,
        Err(err) => {
            log::info!("audio: clip {} failed ({err:?}), using speech", request.clip_url);
            speak(request).await
        }
    }
}

async fn play_clip(request: &PronunciationRequest) -> Result<(), JsValue> {
    let audio = HtmlAudioElement::new_with_src(&request.clip_url)?;
    audio.set_volume(request.volume as f64);
    JsFuture::from(audio.play()?).await?;
    sleep(request.settle_ms).await
}

async fn speak(request: &PronunciationRequest) -> PlaybackOutcome {
    let Some(window) = web_sys::window() else {
        return PlaybackOutcome::Unsupported;
    };
    if !Reflect::has(&window, &JsValue::from_str("speechSynthesis")).unwrap_or(false) {
        return PlaybackOutcome::Unsupported;
    }
    let (Ok(synth), Ok(utterance)) = (
        window.speech_synthesis(),
        SpeechSynthesisUtterance::new_with_text(&request.glyph),
    ) else {
        return PlaybackOutcome::Unsupported;
    };

    utterance.set_lang(&request.lang);
    utterance.set_rate(request.rate);
    utterance.set_volume(request.volume);

    let finished = Promise::new(&mut |resolve: Function, reject: Function| {
        utterance.set_onend(Some(&resolve));
        utterance.set_onerror(Some(&reject));
    });
    synth.speak(&utterance);

    speech_outcome(JsFuture::from(finished).await.map(|_| ()))
}

// Once an utterance has been dispatched the browser does support speech, so
// an `error` event (no voice for the language, cancelled) is not reported as
// unsupported.
fn speech_outcome<E: std::fmt::Debug>(ended: Result<(), E>) -> PlaybackOutcome {
    if let Err(err) = ended {
        log::warn!("audio: speech failed: {err:?}");
    }
    PlaybackOutcome::PlayedViaFallback
}

async fn sleep(ms: u32) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut scheduled = Ok(0);
    let delay = Promise::new(&mut |resolve: Function, _reject: Function| {
        scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
    });
    scheduled?;
    JsFuture::from(delay).await.map(|_| ())
}
