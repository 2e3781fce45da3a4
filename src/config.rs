use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "SMARTY_STARS_DATA_DIR";
pub const LOG_VAR: &str = "SMARTY_STARS_LOG";
pub const TTS_VAR: &str = "SMARTY_STARS_TTS";
pub const PLAYER_VAR: &str = "SMARTY_STARS_PLAYER";

const DB_FILE: &str = "smarty-stars.db";
const LOG_FILE: &str = "smarty-stars.log";

/// Which external program backs a feedback emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendChoice {
    /// Probe the usual programs on first use.
    Auto,
    Disabled,
    Command(String),
}

impl BackendChoice {
    fn parse(value: Option<String>) -> Self {
        match value.map(|v| v.trim().to_string()) {
            None => BackendChoice::Auto,
            Some(v) if v.is_empty() || v.eq_ignore_ascii_case("auto") => BackendChoice::Auto,
            Some(v) if v.eq_ignore_ascii_case("none") || v.eq_ignore_ascii_case("off") => {
                BackendChoice::Disabled
            }
            Some(v) => BackendChoice::Command(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub speech: BackendChoice,
    pub player: BackendChoice,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir(&lookup));
        let log_path = lookup(LOG_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(LOG_FILE));

        Self {
            db_path: data_dir.join(DB_FILE),
            log_path,
            speech: BackendChoice::parse(lookup(TTS_VAR)),
            player: BackendChoice::parse(lookup(PLAYER_VAR)),
            data_dir,
        }
    }

    pub fn tone_dir(&self) -> PathBuf {
        self.data_dir.join("tones")
    }
}

fn default_data_dir<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if cfg!(target_os = "windows") {
        let home = lookup("USERPROFILE").unwrap_or_else(|| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\smarty-stars")
    } else {
        let home = lookup("HOME").unwrap_or_else(|| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/smarty-stars")
    }
}
