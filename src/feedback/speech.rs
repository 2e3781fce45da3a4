use crate::config::BackendChoice;
use crate::error::FeedbackError;
use crate::logger;
use regex::Regex;
use std::cell::OnceCell;
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Words per minute at rate 1.0 for espeak and say.
const BASE_WPM: f32 = 175.0;
/// espeak pitch at 1.0; espeak accepts 0..=99.
const BASE_ESPEAK_PITCH: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utterance<'a> {
    pub text: &'a str,
    pub rate: f32,
    pub pitch: f32,
}

pub trait SpeechEngine {
    /// Start speaking, cancelling whatever is in flight first.
    fn speak(&mut self, utterance: &Utterance<'_>) -> Result<(), FeedbackError>;
    fn cancel(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub language: String,
}

/// Prefer the first English-tagged voice, else the first voice.
pub fn pick_voice(voices: &[Voice]) -> Option<&Voice> {
    let english = Regex::new("(?i)en").ok()?;
    voices
        .iter()
        .find(|v| english.is_match(&v.language))
        .or_else(|| voices.first())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechProgram {
    EspeakNg,
    Espeak,
    SpdSay,
    Say,
}

impl SpeechProgram {
    pub const PROBE_ORDER: [SpeechProgram; 4] = [
        SpeechProgram::EspeakNg,
        SpeechProgram::Espeak,
        SpeechProgram::SpdSay,
        SpeechProgram::Say,
    ];

    pub fn command(self) -> &'static str {
        match self {
            SpeechProgram::EspeakNg => "espeak-ng",
            SpeechProgram::Espeak => "espeak",
            SpeechProgram::SpdSay => "spd-say",
            SpeechProgram::Say => "say",
        }
    }

    /// Recognise a program from a command name or path.
    pub fn from_command(command: &str) -> Option<Self> {
        let stem = Path::new(command).file_stem()?.to_str()?;
        Self::PROBE_ORDER.into_iter().find(|p| p.command() == stem)
    }

    fn list_voices_args(self) -> &'static [&'static str] {
        match self {
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => &["--voices"],
            SpeechProgram::SpdSay => &["-L"],
            SpeechProgram::Say => &["-v", "?"],
        }
    }

    pub fn parse_voices(self, output: &str) -> Vec<Voice> {
        match self {
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => parse_espeak_voices(output),
            SpeechProgram::SpdSay => parse_spd_voices(output),
            SpeechProgram::Say => parse_say_voices(output),
        }
    }

    /// Command-line arguments that speak `utterance` with `voice`.
    pub fn args(self, utterance: &Utterance<'_>, voice: Option<&Voice>) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => {
                let wpm = (BASE_WPM * utterance.rate).round().max(1.0) as u32;
                let pitch = (BASE_ESPEAK_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32;
                args.extend(["-s".to_string(), wpm.to_string()]);
                args.extend(["-p".to_string(), pitch.to_string()]);
                if let Some(voice) = voice {
                    args.extend(["-v".to_string(), voice.language.clone()]);
                }
            }
            SpeechProgram::SpdSay => {
                args.extend(["-r".to_string(), relative_percent(utterance.rate).to_string()]);
                args.extend(["-p".to_string(), relative_percent(utterance.pitch).to_string()]);
                if let Some(voice) = voice {
                    args.extend(["-y".to_string(), voice.name.clone()]);
                }
            }
            SpeechProgram::Say => {
                let wpm = (BASE_WPM * utterance.rate).round().max(1.0) as u32;
                args.extend(["-r".to_string(), wpm.to_string()]);
                if let Some(voice) = voice {
                    args.extend(["-v".to_string(), voice.name.clone()]);
                }
            }
        }
        args.push(utterance.text.to_string());
        args
    }

    /// spd-say queues speech in a daemon, so killing the client is not enough.
    fn cancel_args(self) -> Option<&'static [&'static str]> {
        match self {
            SpeechProgram::SpdSay => Some(&["-C"]),
            _ => None,
        }
    }
}

/// Map a 1.0-centred factor onto spd-say's -100..=100 scale.
fn relative_percent(factor: f32) -> i32 {
    ((factor - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32
}

fn parse_espeak_voices(output: &str) -> Vec<Voice> {
    // Pty Language       Age/Gender VoiceName          File          Other Languages
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return None;
            }
            Some(Voice {
                name: parts[3].to_string(),
                language: parts[1].to_string(),
            })
        })
        .collect()
}

fn parse_spd_voices(output: &str) -> Vec<Voice> {
    // NAME    LANGUAGE    VARIANT
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                return None;
            }
            Some(Voice {
                name: parts[0].to_string(),
                language: parts[1].to_string(),
            })
        })
        .collect()
}

fn parse_say_voices(output: &str) -> Vec<Voice> {
    // Alex                en_US    # Most people recognize me by my voice.
    let Ok(line_re) = Regex::new(r"^(.+?)\s+([A-Za-z]{2,3}[_-][A-Za-z0-9]+)\s+#") else {
        return Vec::new();
    };
    output
        .lines()
        .filter_map(|line| {
            let caps = line_re.captures(line)?;
            Some(Voice {
                name: caps[1].trim().to_string(),
                language: caps[2].to_string(),
            })
        })
        .collect()
}

#[derive(Debug)]
struct SpeechBackend {
    program: SpeechProgram,
    command: String,
    voice: Option<Voice>,
}

/// Narration through an external speech command, detected on first use.
pub struct CommandSpeech {
    choice: BackendChoice,
    backend: OnceCell<Option<SpeechBackend>>,
    current: Option<Child>,
    /// Killed utterances and cancel commands that have not exited yet.
    stopping: Vec<Child>,
}

impl CommandSpeech {
    pub fn new(choice: BackendChoice) -> Self {
        Self {
            choice,
            backend: OnceCell::new(),
            current: None,
            stopping: Vec::new(),
        }
    }

    fn reap(&mut self) {
        self.stopping
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl SpeechEngine for CommandSpeech {
    fn speak(&mut self, utterance: &Utterance<'_>) -> Result<(), FeedbackError> {
        self.cancel();

        let Some(backend) = self.backend.get_or_init(|| detect_backend(&self.choice)) else {
            return Err(FeedbackError::Unavailable("speech"));
        };

        let child = Command::new(&backend.command)
            .args(backend.program.args(utterance, backend.voice.as_ref()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| FeedbackError::Spawn {
                command: backend.command.clone(),
                source,
            })?;
        self.current = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        self.reap();

        if let Some(mut child) = self.current.take()
            && matches!(child.try_wait(), Ok(None))
        {
            let _ = child.kill();
            self.stopping.push(child);
        }

        if let Some(Some(backend)) = self.backend.get()
            && let Some(args) = backend.program.cancel_args()
        {
            let spawned = Command::new(&backend.command)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if let Ok(child) = spawned {
                self.stopping.push(child);
            }
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
        for child in &mut self.stopping {
            let _ = child.wait();
        }
    }
}

fn detect_backend(choice: &BackendChoice) -> Option<SpeechBackend> {
    let (program, command) = match choice {
        BackendChoice::Disabled => {
            logger::log("Narration disabled by configuration");
            return None;
        }
        BackendChoice::Command(command) => match SpeechProgram::from_command(command) {
            Some(program) => (program, command.clone()),
            None => {
                logger::log(&format!("Unsupported speech command: {}", command));
                return None;
            }
        },
        BackendChoice::Auto => {
            let found = SpeechProgram::PROBE_ORDER.into_iter().find_map(|program| {
                which::which(program.command())
                    .ok()
                    .map(|path| (program, path.to_string_lossy().to_string()))
            });
            match found {
                Some(found) => found,
                None => {
                    logger::log("No speech command found; narration is off");
                    return None;
                }
            }
        }
    };

    let voice = Command::new(&command)
        .args(program.list_voices_args())
        .stderr(Stdio::null())
        .output()
        .ok()
        .and_then(|out| {
            let voices = program.parse_voices(&String::from_utf8_lossy(&out.stdout));
            pick_voice(&voices).cloned()
        });

    logger::log(&format!(
        "Narration via {} (voice: {})",
        command,
        voice.as_ref().map(|v| v.name.as_str()).unwrap_or("default")
    ));

    Some(SpeechBackend {
        program,
        command,
        voice,
    })
}
