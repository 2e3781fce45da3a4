use crate::store::StoredValue;
use serde::{Deserialize, Serialize};

pub const USER_KEY: &str = "g3_user";
pub const ROUTE_KEY: &str = "g3_route";
pub const PROGRESS_KEY: &str = "g3_progress";
pub const SETTINGS_KEY: &str = "g3_settings";

pub const APP_NAME: &str = "SmartyStars";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub onboarded: bool,
}

impl StoredValue for UserProfile {}

/// One of the three quiz domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Math,
    English,
    Quiz,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 3] = [ModuleKind::Math, ModuleKind::English, ModuleKind::Quiz];

    pub fn route(self) -> Route {
        match self {
            ModuleKind::Math => Route::Math,
            ModuleKind::English => Route::English,
            ModuleKind::Quiz => Route::Quiz,
        }
    }
}

/// The top-level screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Dashboard,
    Math,
    English,
    Quiz,
    Profile,
}

impl StoredValue for Route {}

impl Route {
    /// Navigation order of the tab bar.
    pub const ALL: [Route; 5] = [
        Route::Dashboard,
        Route::Math,
        Route::English,
        Route::Quiz,
        Route::Profile,
    ];

    pub fn module(self) -> Option<ModuleKind> {
        match self {
            Route::Math => Some(ModuleKind::Math),
            Route::English => Some(ModuleKind::English),
            Route::Quiz => Some(ModuleKind::Quiz),
            Route::Dashboard | Route::Profile => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Math => "Math",
            Route::English => "English",
            Route::Quiz => "Quiz",
            Route::Profile => "Profile",
        }
    }

    pub fn next(self) -> Route {
        let i = Self::position(self);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Route {
        let i = Self::position(self);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(route: Route) -> usize {
        Self::ALL.iter().position(|r| *r == route).unwrap_or(0)
    }
}

/// Stars earned per module. Counters only grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressCounters {
    pub math: u32,
    pub english: u32,
    pub quiz: u32,
}

impl StoredValue for ProgressCounters {}

impl ProgressCounters {
    pub fn get(&self, module: ModuleKind) -> u32 {
        match module {
            ModuleKind::Math => self.math,
            ModuleKind::English => self.english,
            ModuleKind::Quiz => self.quiz,
        }
    }

    pub fn award(&mut self, module: ModuleKind) {
        let counter = match module {
            ModuleKind::Math => &mut self.math,
            ModuleKind::English => &mut self.english,
            ModuleKind::Quiz => &mut self.quiz,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.math
            .saturating_add(self.english)
            .saturating_add(self.quiz)
    }
}

/// Events posted back to the UI loop by background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A module's result delay has elapsed.
    Advance { module: ModuleKind, ticket: u64 },
}

pub const MIN_VOICE_RATE: f32 = 0.1;
pub const MAX_VOICE_RATE: f32 = 10.0;
pub const MIN_VOICE_PITCH: f32 = 0.0;
pub const MAX_VOICE_PITCH: f32 = 2.0;

/// Accessibility settings. Rate and pitch have no screen; they are tuned in storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub voice: bool,
    pub sounds: bool,
    pub voice_rate: f32,
    pub voice_pitch: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            voice: true,
            sounds: true,
            voice_rate: 1.0,
            voice_pitch: 1.0,
        }
    }
}

impl StoredValue for Settings {
    fn sanitize(self) -> Self {
        Self {
            voice_rate: clamp_or_default(self.voice_rate, MIN_VOICE_RATE, MAX_VOICE_RATE),
            voice_pitch: clamp_or_default(self.voice_pitch, MIN_VOICE_PITCH, MAX_VOICE_PITCH),
            ..self
        }
    }
}

/// Zero counts as unset, like a missing value.
fn clamp_or_default(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() && value != 0.0 {
        value.clamp(min, max)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{load, MemoryStorage};

    #[test]
    fn test_defaults() {
        assert_eq!(
            UserProfile::default(),
            UserProfile {
                name: String::new(),
                onboarded: false
            }
        );
        assert_eq!(Route::default(), Route::Dashboard);
        assert_eq!(ProgressCounters::default().total(), 0);
        let settings = Settings::default();
        assert!(settings.voice && settings.sounds);
        assert_eq!(settings.voice_rate, 1.0);
        assert_eq!(settings.voice_pitch, 1.0);
    }

    #[test]
    fn test_settings_use_camel_case_fields() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert_eq!(
            json,
            "{\"voice\":true,\"sounds\":true,\"voiceRate\":1.0,\"voicePitch\":1.0}"
        );
    }

    #[test]
    fn test_settings_missing_fields_take_defaults() {
        let storage = MemoryStorage::with_entries([(SETTINGS_KEY, "{\"sounds\":false}")]);
        let settings = load(&storage, SETTINGS_KEY, Settings::default());
        assert!(settings.voice);
        assert!(!settings.sounds);
        assert_eq!(settings.voice_rate, 1.0);
    }

    #[test]
    fn test_settings_out_of_range_are_clamped() {
        let storage = MemoryStorage::with_entries([(
            SETTINGS_KEY,
            "{\"voice\":true,\"sounds\":true,\"voiceRate\":40,\"voicePitch\":-3}",
        )]);
        let settings = load(&storage, SETTINGS_KEY, Settings::default());
        assert_eq!(settings.voice_rate, MAX_VOICE_RATE);
        assert_eq!(settings.voice_pitch, MIN_VOICE_PITCH);
    }

    #[test]
    fn test_zero_rate_and_pitch_fall_back_to_one() {
        let storage = MemoryStorage::with_entries([(
            SETTINGS_KEY,
            "{\"voice\":true,\"sounds\":true,\"voiceRate\":0,\"voicePitch\":0}",
        )]);
        let settings = load(&storage, SETTINGS_KEY, Settings::default());
        assert_eq!(settings.voice_rate, 1.0);
        assert_eq!(settings.voice_pitch, 1.0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let storage = MemoryStorage::with_entries([(
            USER_KEY,
            "{\"name\":\"Ava\",\"onboarded\":true,\"avatar\":\"cat\"}",
        )]);
        let user = load(&storage, USER_KEY, UserProfile::default());
        assert_eq!(user.name, "Ava");
        assert!(user.onboarded);
    }

    #[test]
    fn test_route_is_stored_lowercase() {
        assert_eq!(serde_json::to_string(&Route::English).unwrap(), "\"english\"");
        let storage = MemoryStorage::with_entries([(ROUTE_KEY, "\"quiz\"")]);
        assert_eq!(load(&storage, ROUTE_KEY, Route::default()), Route::Quiz);
    }

    #[test]
    fn test_unknown_route_falls_back_to_dashboard() {
        let storage = MemoryStorage::with_entries([(ROUTE_KEY, "\"settings\"")]);
        assert_eq!(load(&storage, ROUTE_KEY, Route::default()), Route::Dashboard);
    }

    #[test]
    fn test_negative_progress_is_rejected() {
        let storage =
            MemoryStorage::with_entries([(PROGRESS_KEY, "{\"math\":-1,\"english\":2,\"quiz\":0}")]);
        assert_eq!(
            load(&storage, PROGRESS_KEY, ProgressCounters::default()),
            ProgressCounters::default()
        );
    }

    #[test]
    fn test_award_touches_only_one_module() {
        let mut progress = ProgressCounters::default();
        progress.award(ModuleKind::English);
        assert_eq!(
            progress,
            ProgressCounters {
                math: 0,
                english: 1,
                quiz: 0
            }
        );
        assert_eq!(progress.get(ModuleKind::English), 1);
        assert_eq!(progress.total(), 1);
    }

    #[test]
    fn test_award_saturates() {
        let mut progress = ProgressCounters {
            math: u32::MAX,
            ..Default::default()
        };
        progress.award(ModuleKind::Math);
        assert_eq!(progress.math, u32::MAX);
    }

    #[test]
    fn test_route_cycle() {
        assert_eq!(Route::Dashboard.next(), Route::Math);
        assert_eq!(Route::Profile.next(), Route::Dashboard);
        assert_eq!(Route::Dashboard.prev(), Route::Profile);
        for module in ModuleKind::ALL {
            assert_eq!(module.route().module(), Some(module));
        }
        assert_eq!(Route::Profile.module(), None);
    }
}
