//! Spoken narration and short tones. Both are best-effort: a missing backend
//! or a failing command is logged and otherwise ignored.

pub mod speech;
pub mod tone;

pub use speech::{CommandSpeech, SpeechEngine, SpeechProgram, Utterance, Voice};
pub use tone::{CommandTones, Tone, ToneSink};

use crate::config::AppConfig;
use crate::error::FeedbackError;
use crate::logger;
use crate::models::Settings;

/// Narration and tone emitters for one application instance.
pub struct Feedback {
    speech: Box<dyn SpeechEngine>,
    tones: Box<dyn ToneSink>,
    speech_unavailable_logged: bool,
    tones_unavailable_logged: bool,
}

impl Feedback {
    pub fn new(speech: Box<dyn SpeechEngine>, tones: Box<dyn ToneSink>) -> Self {
        Self {
            speech,
            tones,
            speech_unavailable_logged: false,
            tones_unavailable_logged: false,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Box::new(CommandSpeech::new(config.speech.clone())),
            Box::new(CommandTones::new(config.player.clone(), config.tone_dir())),
        )
    }

    /// Speak `text`, replacing anything still being spoken.
    pub fn narrate(&mut self, text: &str, settings: &Settings) {
        if !settings.voice {
            return;
        }
        let utterance = Utterance {
            text,
            rate: settings.voice_rate,
            pitch: settings.voice_pitch,
        };
        if let Err(e) = self.speech.speak(&utterance) {
            Self::report("Narration", e, &mut self.speech_unavailable_logged);
        }
    }

    /// Stop any utterance in flight.
    pub fn silence(&mut self) {
        self.speech.cancel();
    }

    pub fn tone(&mut self, tone: Tone, settings: &Settings) {
        if !settings.sounds {
            return;
        }
        if let Err(e) = self.tones.play(tone) {
            Self::report("Tone", e, &mut self.tones_unavailable_logged);
        }
    }

    fn report(what: &str, error: FeedbackError, unavailable_logged: &mut bool) {
        if matches!(error, FeedbackError::Unavailable(_)) {
            if *unavailable_logged {
                return;
            }
            *unavailable_logged = true;
        }
        logger::log(&format!("{} failed: {}", what, error));
    }
}
