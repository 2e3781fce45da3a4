use crate::config::BackendChoice;
use crate::error::FeedbackError;
use crate::logger;
use std::cell::OnceCell;
use std::f32::consts::TAU;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

pub const SAMPLE_RATE: u32 = 22_050;

/// Gain at the first sample; the envelope ramps exponentially from here.
const FLOOR_GAIN: f32 = 0.0001;
const ATTACK_SECS: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Click,
    Correct,
    Wrong,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Click, Tone::Correct, Tone::Wrong];

    pub fn frequency(self) -> f32 {
        match self {
            Tone::Click => 1000.0,
            Tone::Correct => 880.0,
            Tone::Wrong => 220.0,
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            Tone::Click => Duration::from_millis(60),
            Tone::Correct => Duration::from_millis(120),
            Tone::Wrong => Duration::from_millis(180),
        }
    }

    pub fn peak_gain(self) -> f32 {
        match self {
            Tone::Click => 0.08,
            Tone::Correct => 0.2,
            Tone::Wrong => 0.15,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tone::Click => "click",
            Tone::Correct => "correct",
            Tone::Wrong => "wrong",
        }
    }

    pub fn correctness(correct: bool) -> Tone {
        if correct { Tone::Correct } else { Tone::Wrong }
    }
}

/// Render `tone` as 16-bit mono PCM.
pub fn synthesize(tone: Tone, sample_rate: u32) -> Vec<i16> {
    let rate = sample_rate as f32;
    let count = (rate * tone.duration().as_secs_f32()).round() as usize;
    let peak = tone.peak_gain();
    let frequency = tone.frequency();

    (0..count)
        .map(|i| {
            let t = i as f32 / rate;
            let gain = if t < ATTACK_SECS {
                FLOOR_GAIN * (peak / FLOOR_GAIN).powf(t / ATTACK_SECS)
            } else {
                peak
            };
            let sample = (TAU * frequency * t).sin() * gain;
            (sample * i16::MAX as f32).round() as i16
        })
        .collect()
}

/// Wrap mono 16-bit samples in a RIFF/WAVE container.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let mut out = Vec::with_capacity(44 + data_len as usize);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        out.extend_from_slice(&sample.to_le_bytes());
    }
    out
}

pub trait ToneSink {
    fn play(&mut self, tone: Tone) -> Result<(), FeedbackError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Player {
    Aplay,
    Paplay,
    Afplay,
}

impl Player {
    const PROBE_ORDER: [Player; 3] = [Player::Aplay, Player::Paplay, Player::Afplay];

    fn command(self) -> &'static str {
        match self {
            Player::Aplay => "aplay",
            Player::Paplay => "paplay",
            Player::Afplay => "afplay",
        }
    }

    fn args(self, file: &Path) -> Vec<String> {
        let file = file.to_string_lossy().to_string();
        match self {
            Player::Aplay => vec!["-q".to_string(), file],
            Player::Paplay | Player::Afplay => vec![file],
        }
    }

    fn from_command(command: &str) -> Option<Self> {
        let stem = Path::new(command).file_stem()?.to_str()?;
        Self::PROBE_ORDER.into_iter().find(|p| p.command() == stem)
    }
}

/// The session's audio output: a player plus the pre-rendered tone files.
#[derive(Debug)]
struct AudioContext {
    player: Player,
    command: String,
    files: [PathBuf; 3],
}

impl AudioContext {
    fn create(choice: &BackendChoice, tone_dir: &Path) -> Result<Option<Self>, FeedbackError> {
        let (player, command) = match choice {
            BackendChoice::Disabled => return Ok(None),
            BackendChoice::Command(command) => match Player::from_command(command) {
                Some(player) => (player, command.clone()),
                None => return Err(FeedbackError::Unavailable("audio player")),
            },
            BackendChoice::Auto => {
                let found = Player::PROBE_ORDER.into_iter().find_map(|player| {
                    which::which(player.command())
                        .ok()
                        .map(|path| (player, path.to_string_lossy().to_string()))
                });
                match found {
                    Some(found) => found,
                    None => return Ok(None),
                }
            }
        };

        std::fs::create_dir_all(tone_dir)?;
        let files = Tone::ALL.map(|tone| tone_dir.join(format!("{}.wav", tone.name())));
        for (tone, file) in Tone::ALL.iter().zip(&files) {
            std::fs::write(file, encode_wav(&synthesize(*tone, SAMPLE_RATE), SAMPLE_RATE))?;
        }

        Ok(Some(Self {
            player,
            command,
            files,
        }))
    }

    fn file(&self, tone: Tone) -> &Path {
        let i = Tone::ALL.iter().position(|t| *t == tone).unwrap_or(0);
        &self.files[i]
    }
}

/// Tones played through an external audio player, set up on first use.
pub struct CommandTones {
    choice: BackendChoice,
    tone_dir: PathBuf,
    context: OnceCell<Option<AudioContext>>,
    playing: Vec<Child>,
}

impl CommandTones {
    pub fn new(choice: BackendChoice, tone_dir: PathBuf) -> Self {
        Self {
            choice,
            tone_dir,
            context: OnceCell::new(),
            playing: Vec::new(),
        }
    }

    fn reap(&mut self) {
        self.playing
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl ToneSink for CommandTones {
    fn play(&mut self, tone: Tone) -> Result<(), FeedbackError> {
        self.reap();

        let context = self.context.get_or_init(|| {
            match AudioContext::create(&self.choice, &self.tone_dir) {
                Ok(Some(context)) => {
                    logger::log(&format!("Tones via {}", context.command));
                    Some(context)
                }
                Ok(None) => {
                    logger::log("No audio player found; tones are off");
                    None
                }
                Err(e) => {
                    logger::log(&format!("Audio setup failed: {}", e));
                    None
                }
            }
        });
        let Some(context) = context else {
            return Err(FeedbackError::Unavailable("audio"));
        };

        let child = Command::new(&context.command)
            .args(context.player.args(context.file(tone)))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| FeedbackError::Spawn {
                command: context.command.clone(),
                source,
            })?;
        self.playing.push(child);
        Ok(())
    }
}
