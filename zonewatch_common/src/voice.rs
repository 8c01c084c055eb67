//! Debounced text-to-speech scheduling. The speech engine itself is an
//! external collaborator behind [`SpeechSynth`]; this module only decides
//! when to speak and keeps the dedup state.

use std::time::{Duration, Instant};

/// Identical utterances are suppressed until this much time has passed,
/// then repeated as a reminder.
pub const REPEAT_COOLDOWN: Duration = Duration::from_millis(3000);

const DEFAULT_LANG: &str = "en-US";
const DEFAULT_RATE: f32 = 1.0;

/// What is being announced. Alerts always speak (subject to dedup);
/// informational object-list announcements can be disabled by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechKind {
    Alert,
    Info,
}

/// One request handed to the speech engine. Fire-and-forget; no
/// completion callback is consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
}

/// External speech-synthesis engine.
pub trait SpeechSynth {
    fn speak(&mut self, utterance: &Utterance);
    /// Cancel any in-flight utterance. At most one utterance is active at
    /// a time; newest wins, nothing is queued.
    fn cancel(&mut self);
}

/// Throttles announcements: suppresses repeated identical text within the
/// cooldown and filters informational speech when disabled.
#[derive(Debug)]
pub struct VoiceNotifier {
    last_spoken_text: String,
    last_speech_at: Option<Instant>,
    info_enabled: bool,
    pub lang: String,
    pub rate: f32,
}

impl Default for VoiceNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceNotifier {
    pub fn new() -> Self {
        Self {
            last_spoken_text: String::new(),
            last_speech_at: None,
            info_enabled: true,
            lang: DEFAULT_LANG.to_string(),
            rate: DEFAULT_RATE,
        }
    }

    pub fn info_enabled(&self) -> bool {
        self.info_enabled
    }

    /// Toggle the informational voice. Disabling it cancels any in-flight
    /// utterance immediately; alert behavior is unaffected either way.
    pub fn set_info_enabled<S: SpeechSynth>(&mut self, engine: &mut S, enabled: bool) {
        self.info_enabled = enabled;
        if !enabled {
            engine.cancel();
        }
    }

    /// Announce `text`, returning whether speech was dispatched.
    ///
    /// Speaks iff the text differs from the last spoken text or the
    /// repeat cooldown has elapsed. On speaking, the previous utterance
    /// is cancelled first and the dedup state is updated. Info-kind calls
    /// are dropped without touching state while the informational voice
    /// is disabled.
    pub fn notify<S: SpeechSynth>(
        &mut self,
        engine: &mut S,
        text: &str,
        kind: SpeechKind,
        now: Instant,
    ) -> bool {
        if kind == SpeechKind::Info && !self.info_enabled {
            return false;
        }

        let cooldown_elapsed = self
            .last_speech_at
            .map_or(true, |at| now.duration_since(at) > REPEAT_COOLDOWN);
        if text == self.last_spoken_text && !cooldown_elapsed {
            return false;
        }

        engine.cancel();
        engine.speak(&Utterance {
            text: text.to_string(),
            lang: self.lang.clone(),
            rate: self.rate,
        });

        self.last_spoken_text = text.to_string();
        self.last_speech_at = Some(now);
        true
    }
}
