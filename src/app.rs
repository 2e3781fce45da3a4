use crate::feedback::{Feedback, Tone};
use crate::logger;
use crate::models::{APP_NAME, AppEvent, ModuleKind, Route};
use crate::runner::{Evaluation, ModuleRunner};
use crate::session::SessionState;
use crate::timer::AdvanceTimer;
use crate::utils::TextInput;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnboardField {
    #[default]
    Name,
    Voice,
    Sounds,
}

impl OnboardField {
    pub fn next(self) -> Self {
        match self {
            OnboardField::Name => OnboardField::Voice,
            OnboardField::Voice => OnboardField::Sounds,
            OnboardField::Sounds => OnboardField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            OnboardField::Name => OnboardField::Sounds,
            OnboardField::Voice => OnboardField::Name,
            OnboardField::Sounds => OnboardField::Voice,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingForm {
    pub name: TextInput,
    pub focus: OnboardField,
}

/// The module on screen together with its pending advance.
struct ActiveModule {
    runner: ModuleRunner,
    timer: AdvanceTimer,
}

pub struct App {
    session: SessionState,
    feedback: Feedback,
    active: Option<ActiveModule>,
    pub onboarding: OnboardingForm,
    pub dashboard_selection: usize,
    events: UnboundedSender<AppEvent>,
    /// Highest ticket handed out by any runner so far.
    last_ticket: u64,
    should_quit: bool,
}

impl App {
    /// Build the app and enter whatever screen the stored route points at.
    pub fn new(session: SessionState, feedback: Feedback, events: UnboundedSender<AppEvent>) -> Self {
        let mut app = Self {
            session,
            feedback,
            active: None,
            onboarding: OnboardingForm::default(),
            dashboard_selection: 0,
            events,
            last_ticket: 0,
            should_quit: false,
        };
        if !app.is_onboarding() {
            app.enter_route();
        }
        app
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn runner(&self) -> Option<&ModuleRunner> {
        self.active.as_ref().map(|a| &a.runner)
    }

    pub fn runner_mut(&mut self) -> Option<&mut ModuleRunner> {
        self.active.as_mut().map(|a| &mut a.runner)
    }

    pub fn has_pending_advance(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.timer.is_pending())
    }

    pub fn is_onboarding(&self) -> bool {
        !self.session.user().onboarded
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn title(&self) -> String {
        let name = &self.session.user().name;
        if name.is_empty() {
            APP_NAME.to_string()
        } else {
            format!("{} • {}", name, APP_NAME)
        }
    }

    /// Finish onboarding with the typed name. Does nothing while the name is blank.
    pub fn login(&mut self) -> bool {
        let name = self.onboarding.name.buffer.clone();
        if !self.session.login(&name) {
            return false;
        }
        logger::log("Onboarding complete");
        self.onboarding = OnboardingForm::default();
        self.dashboard_selection = 0;
        self.enter_route();
        true
    }

    pub fn logout(&mut self) {
        self.leave_route();
        self.feedback.silence();
        self.session.logout();
        logger::log("Logged out");
    }

    pub fn navigate(&mut self, route: Route) {
        if self.is_onboarding() || route == self.session.route() {
            return;
        }
        self.leave_route();
        self.session.navigate(route);
        logger::log(&format!("Route -> {:?}", route));
        self.feedback.tone(Tone::Click, self.session.settings());
        self.enter_route();
    }

    pub fn select_dashboard(&mut self, delta: isize) {
        let last = ModuleKind::ALL.len() as isize - 1;
        self.dashboard_selection = (self.dashboard_selection as isize + delta).clamp(0, last) as usize;
    }

    pub fn open_selected_module(&mut self) {
        if let Some(module) = ModuleKind::ALL.get(self.dashboard_selection) {
            self.navigate(module.route());
        }
    }

    /// Submit the current selection or typed answer of the active module.
    pub fn submit(&mut self) {
        let evaluation = self.runner_mut().and_then(|r| r.submit_current());
        if let Some(evaluation) = evaluation {
            self.apply_evaluation(evaluation);
        }
    }

    /// Pick choice `n` (zero-based) in a multiple-choice module.
    pub fn pick(&mut self, n: usize) {
        let evaluation = self.runner_mut().and_then(|r| r.pick(n));
        if let Some(evaluation) = evaluation {
            self.apply_evaluation(evaluation);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Advance { module, ticket } => {
                let advanced = self
                    .runner_mut()
                    .is_some_and(|r| r.kind() == module && r.advance(ticket));
                if advanced {
                    self.narrate_current_question();
                } else {
                    logger::log(&format!("Ignored stale advance for {:?}", module));
                }
            }
        }
    }

    pub fn toggle_voice(&mut self) {
        self.session.toggle_voice();
        if !self.session.settings().voice {
            self.feedback.silence();
        }
    }

    pub fn toggle_sounds(&mut self) {
        self.session.toggle_sounds();
    }

    pub fn quit(&mut self) {
        self.leave_route();
        self.feedback.silence();
        self.session.flush();
        self.should_quit = true;
    }

    fn apply_evaluation(&mut self, evaluation: Evaluation) {
        logger::log(&format!(
            "{:?} answer: {}",
            evaluation.module,
            if evaluation.correct { "correct" } else { "wrong" }
        ));

        if evaluation.correct {
            self.session.award_star(evaluation.module);
        }
        let settings = *self.session.settings();
        self.feedback.tone(Tone::correctness(evaluation.correct), &settings);
        self.feedback.narrate(&evaluation.narration, &settings);

        if let Some(active) = self.active.as_mut() {
            active.timer.arm(
                evaluation.delay,
                self.events.clone(),
                AppEvent::Advance {
                    module: evaluation.module,
                    ticket: evaluation.ticket,
                },
            );
        }
    }

    fn enter_route(&mut self) {
        let route = self.session.route();
        match route.module() {
            Some(kind) => {
                self.active = Some(ActiveModule {
                    runner: ModuleRunner::starting_at(kind, self.last_ticket),
                    timer: AdvanceTimer::new(),
                });
                self.narrate_current_question();
            }
            None if route == Route::Dashboard => {
                let text = format!(
                    "Welcome {}. Choose a module to begin.",
                    self.session.user().name
                );
                self.feedback.narrate(&text, self.session.settings());
            }
            None => {}
        }
    }

    /// Tear down the active module; its pending advance is cancelled.
    fn leave_route(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        self.last_ticket = self.last_ticket.max(active.runner.ticket());
        if active.timer.is_pending() {
            active.timer.cancel();
            logger::log(&format!(
                "Cancelled pending advance for {:?}",
                active.runner.kind()
            ));
        }
    }

    fn narrate_current_question(&mut self) {
        if let Some(active) = &self.active {
            let text = active.runner.entry_narration();
            self.feedback.narrate(&text, self.session.settings());
        }
    }
}
