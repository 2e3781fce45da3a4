use crate::logger;
use crate::models::{
    ModuleKind, ProgressCounters, Route, Settings, UserProfile, PROGRESS_KEY, ROUTE_KEY,
    SETTINGS_KEY, USER_KEY,
};
use crate::store::{load, Persisted, Storage, StoreHandle};
use std::io;

/// The four persisted values. Each is stored under its own key and loads on its own.
pub struct SessionState {
    user: Persisted<UserProfile>,
    route: Persisted<Route>,
    progress: Persisted<ProgressCounters>,
    settings: Persisted<Settings>,
    store: StoreHandle,
}

impl SessionState {
    /// Load every value from `storage`, then hand `storage` to the background writer.
    pub fn open(storage: Box<dyn Storage>) -> io::Result<Self> {
        let user = load(storage.as_ref(), USER_KEY, UserProfile::default());
        let route = load(storage.as_ref(), ROUTE_KEY, Route::default());
        let progress = load(storage.as_ref(), PROGRESS_KEY, ProgressCounters::default());
        let settings = load(storage.as_ref(), SETTINGS_KEY, Settings::default());

        let store = StoreHandle::spawn(storage)?;
        logger::log(&format!(
            "Loaded session: onboarded={} route={:?} stars={}",
            user.onboarded,
            route,
            progress.total()
        ));

        Ok(Self {
            user: Persisted::new(USER_KEY, user, store.clone()),
            route: Persisted::new(ROUTE_KEY, route, store.clone()),
            progress: Persisted::new(PROGRESS_KEY, progress, store.clone()),
            settings: Persisted::new(SETTINGS_KEY, settings, store.clone()),
            store,
        })
    }

    pub fn user(&self) -> &UserProfile {
        self.user.get()
    }

    pub fn route(&self) -> Route {
        *self.route.get()
    }

    pub fn progress(&self) -> &ProgressCounters {
        self.progress.get()
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get()
    }

    /// Onboard `name` and land on the dashboard. Blank names are refused.
    pub fn login(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.user.set(UserProfile {
            name: name.to_string(),
            onboarded: true,
        });
        self.route.set(Route::Dashboard);
        true
    }

    /// Forget the profile. Stars are kept.
    pub fn logout(&mut self) {
        self.user.set(UserProfile::default());
    }

    pub fn navigate(&mut self, route: Route) {
        self.route.set(route);
    }

    pub fn award_star(&mut self, module: ModuleKind) {
        self.progress.update(|p| p.award(module));
    }

    pub fn toggle_voice(&mut self) {
        self.settings.update(|s| s.voice = !s.voice);
    }

    pub fn toggle_sounds(&mut self) {
        self.settings.update(|s| s.sounds = !s.sounds);
    }

    /// Wait for queued writes to land.
    pub fn flush(&self) {
        self.store.flush();
    }
}
