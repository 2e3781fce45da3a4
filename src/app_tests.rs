//! End-to-end scenarios: keys in, screens, stars, storage and feedback out.

use crate::app::App;
use crate::catalog::{Answer, Choice};
use crate::feedback::Tone;
use crate::feedback::testing::{Emitted, Recorder};
use crate::input::handle_key;
use crate::models::{
    AppEvent, ModuleKind, PROGRESS_KEY, ProgressCounters, ROUTE_KEY, Route, USER_KEY,
    UserProfile,
};
use crate::runner::Phase;
use crate::session::SessionState;
use crate::store::MemoryStorage;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::Instant;

struct Harness {
    app: App,
    recorder: Recorder,
    storage: MemoryStorage,
    rx: UnboundedReceiver<AppEvent>,
}

impl Harness {
    fn new(storage: MemoryStorage) -> Self {
        let recorder = Recorder::new();
        let session = SessionState::open(Box::new(storage.clone())).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(session, recorder.feedback(), tx);
        Self {
            app,
            recorder,
            storage,
            rx,
        }
    }

    fn fresh() -> Self {
        Self::new(MemoryStorage::new())
    }

    fn logged_in() -> Self {
        let mut h = Self::fresh();
        h.type_text("Ava");
        h.press(KeyCode::Enter);
        assert!(!h.app.is_onboarding());
        h.recorder.clear();
        h
    }

    fn press(&mut self, code: KeyCode) {
        handle_key(&mut self.app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Wait for the pending advance and feed it back to the app.
    async fn deliver_advance(&mut self) -> Duration {
        let start = Instant::now();
        let event = self.rx.recv().await.unwrap();
        self.app.handle_event(event);
        start.elapsed()
    }

    fn index(&self) -> usize {
        self.app.runner().unwrap().index()
    }

    fn progress(&self) -> ProgressCounters {
        *self.app.session().progress()
    }

    /// Answer the current question, rightly or wrongly.
    fn answer(&mut self, right: bool) {
        let question = self.app.runner().unwrap().current();
        match question.answer {
            Answer::Exact(expected) => {
                let wanted = |c: &Choice| (*c == expected) == right;
                let n = question.choices.iter().position(wanted).unwrap();
                self.app.pick(n);
            }
            Answer::FreeText(word) => {
                self.type_text(if right { word } else { "xyz" });
                self.app.submit();
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_fresh_session_onboards_to_dashboard() {
    let mut h = Harness::fresh();
    assert!(h.app.is_onboarding());
    assert_eq!(h.app.title(), "SmartyStars");

    // Blank names are refused.
    h.type_text("  ");
    h.press(KeyCode::Enter);
    assert!(h.app.is_onboarding());

    for _ in 0..2 {
        h.press(KeyCode::Backspace);
    }
    h.type_text("Ava");
    h.press(KeyCode::Enter);

    assert_eq!(
        h.app.session().user(),
        &UserProfile {
            name: "Ava".to_string(),
            onboarded: true
        }
    );
    assert_eq!(h.app.session().route(), Route::Dashboard);
    assert_eq!(h.app.title(), "Ava • SmartyStars");
    assert_eq!(
        h.recorder.spoken(),
        vec!["Welcome Ava. Choose a module to begin."]
    );

    h.app.session().flush();
    assert_eq!(
        h.storage.raw(USER_KEY).as_deref(),
        Some("{\"name\":\"Ava\",\"onboarded\":true}")
    );
}

#[tokio::test(start_paused = true)]
async fn test_onboarding_toggles_settings_before_login() {
    let mut h = Harness::fresh();
    h.press(KeyCode::Tab);
    h.press(KeyCode::Char(' '));
    h.press(KeyCode::Tab);
    h.press(KeyCode::Char(' '));
    h.press(KeyCode::Char('x'));

    let settings = *h.app.session().settings();
    assert!(!settings.voice);
    assert!(!settings.sounds);
    // Focus is on a checkbox, so typing does not reach the name.
    assert!(h.app.onboarding.name.buffer.is_empty());

    h.press(KeyCode::Tab);
    h.type_text("Ava");
    h.press(KeyCode::Enter);

    assert!(!h.app.is_onboarding());
    assert!(h.recorder.spoken().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_math_correct_answer_awards_star_and_advances() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('1'));

    assert_eq!(h.app.session().route(), Route::Math);
    assert_eq!(h.recorder.tones(), vec![Tone::Click]);
    assert_eq!(h.recorder.spoken(), vec!["Question: 7 + 5 = ?"]);
    h.recorder.clear();

    // Third choice is 12.
    h.press(KeyCode::Char('3'));

    assert_eq!(
        h.progress(),
        ProgressCounters {
            math: 1,
            english: 0,
            quiz: 0
        }
    );
    assert_eq!(
        h.app.runner().unwrap().phase(),
        &Phase::Evaluating {
            correct: true,
            label: "✔ Correct".to_string()
        }
    );
    assert_eq!(h.recorder.tones(), vec![Tone::Correct]);
    assert_eq!(h.recorder.spoken(), vec!["Correct! Well done."]);
    assert!(h.app.has_pending_advance());

    let waited = h.deliver_advance().await;
    assert!(waited >= Duration::from_millis(900));
    assert_eq!(h.index(), 1);
    assert_eq!(h.app.runner().unwrap().phase(), &Phase::Presenting);
    assert_eq!(
        h.recorder.spoken().last().map(String::as_str),
        Some("Question: 9 - 4 = ?")
    );

    h.app.session().flush();
    assert_eq!(
        h.storage.raw(PROGRESS_KEY).as_deref(),
        Some("{\"math\":1,\"english\":0,\"quiz\":0}")
    );
}

#[tokio::test(start_paused = true)]
async fn test_arrow_keys_select_then_enter_answers() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('1'));

    // 10 11 / 12 13: down lands on 12.
    h.press(KeyCode::Down);
    assert_eq!(h.app.runner().unwrap().selected_choice, 2);
    h.press(KeyCode::Enter);

    assert_eq!(h.progress().math, 1);
}

#[tokio::test(start_paused = true)]
async fn test_english_wrong_answer_shows_expected_word() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('2'));
    assert_eq!(
        h.recorder.spoken(),
        vec!["Choose the correct spelling: A. recieve  B. receive  C. recive"]
    );

    h.type_text(" Receive ");
    h.press(KeyCode::Enter);
    assert_eq!(h.progress().english, 1);
    let waited = h.deliver_advance().await;
    assert!(waited >= Duration::from_millis(700));
    assert!(waited < Duration::from_millis(900));
    assert_eq!(h.index(), 1);
    h.recorder.clear();

    h.type_text("Run");
    h.press(KeyCode::Enter);

    assert_eq!(h.progress().english, 1);
    assert_eq!(
        h.app.runner().unwrap().result_label(),
        Some("The correct answer is happiness")
    );
    assert_eq!(h.recorder.tones(), vec![Tone::Wrong]);
    assert_eq!(h.recorder.spoken(), vec!["The correct answer is happiness"]);
    assert!(h.app.runner().unwrap().input.buffer.is_empty());

    h.deliver_advance().await;
    assert_eq!(h.index(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_empty_english_submission_is_wrong() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('2'));
    h.press(KeyCode::Enter);

    assert_eq!(h.progress(), ProgressCounters::default());
    assert_eq!(h.recorder.tones().last(), Some(&Tone::Wrong));
}

#[tokio::test(start_paused = true)]
async fn test_quiz_cycles_back_to_first_question() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('3'));

    // Dog, then 11.
    h.press(KeyCode::Char('3'));
    assert_eq!(
        h.recorder.spoken().last().map(String::as_str),
        Some("Nice! You earned a star.")
    );
    h.deliver_advance().await;
    h.press(KeyCode::Char('2'));
    h.deliver_advance().await;

    assert_eq!(h.index(), 0);
    assert_eq!(h.progress().quiz, 2);
    assert_eq!(
        h.recorder.spoken().last().map(String::as_str),
        Some("Quiz: Which is a mammal?")
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_submission_while_evaluating_is_ignored() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('3'));
    h.press(KeyCode::Char('3'));
    h.press(KeyCode::Enter);

    assert_eq!(h.progress().math, 1);
    assert_eq!(h.recorder.tones(), vec![Tone::Click, Tone::Correct]);

    h.deliver_advance().await;
    assert_eq!(h.index(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_navigation_cancels_pending_advance() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('3'));
    assert!(h.app.has_pending_advance());

    h.press(KeyCode::Esc);
    assert_eq!(h.app.session().route(), Route::Dashboard);
    assert!(h.app.runner().is_none());
    h.press(KeyCode::Char('1'));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(h.rx.try_recv().is_err());
    assert_eq!(h.index(), 0);
    // The star was earned at submit time.
    assert_eq!(h.progress().math, 1);
}

#[tokio::test(start_paused = true)]
async fn test_queued_advance_from_left_module_is_ignored_after_reentry() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('3'));

    // Let the advance land in the channel without handling it.
    tokio::time::sleep(Duration::from_secs(1)).await;
    h.press(KeyCode::Esc);
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('3'));

    let queued = h.rx.try_recv().unwrap();
    h.app.handle_event(queued);
    assert_eq!(h.index(), 0);
    assert!(h.app.runner().unwrap().is_evaluating());

    let waited = h.deliver_advance().await;
    assert!(waited >= Duration::from_millis(900));
    assert_eq!(h.index(), 1);
    assert_eq!(h.progress().math, 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_advance_does_not_move_new_runner() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('1'));

    h.app.handle_event(AppEvent::Advance {
        module: ModuleKind::Math,
        ticket: 1,
    });
    assert_eq!(h.index(), 0);

    h.press(KeyCode::Char('1'));
    h.app.handle_event(AppEvent::Advance {
        module: ModuleKind::Quiz,
        ticket: 1,
    });
    assert_eq!(h.index(), 0);
    assert!(h.app.runner().unwrap().is_evaluating());
}

#[tokio::test(start_paused = true)]
async fn test_tab_cycles_routes_and_clicks() {
    let mut h = Harness::logged_in();
    let mut seen = Vec::new();
    for _ in 0..Route::ALL.len() {
        h.press(KeyCode::Tab);
        seen.push(h.app.session().route());
    }

    assert_eq!(
        seen,
        vec![
            Route::Math,
            Route::English,
            Route::Quiz,
            Route::Profile,
            Route::Dashboard
        ]
    );
    assert_eq!(h.recorder.tones(), vec![Tone::Click; 5]);

    h.press(KeyCode::BackTab);
    assert_eq!(h.app.session().route(), Route::Profile);
}

#[tokio::test(start_paused = true)]
async fn test_logout_keeps_stars() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('3'));
    h.deliver_advance().await;
    h.press(KeyCode::Esc);
    h.press(KeyCode::Char('3'));
    h.press(KeyCode::Char('3'));
    let before = h.progress();

    h.press(KeyCode::Esc);
    h.press(KeyCode::Char('l'));

    assert!(h.app.is_onboarding());
    assert_eq!(h.app.session().user(), &UserProfile::default());
    assert_eq!(h.app.title(), "SmartyStars");
    assert_eq!(h.progress(), before);
    assert_eq!(before.total(), 2);
    assert!(h.recorder.events().contains(&Emitted::Cancelled));
}

#[tokio::test(start_paused = true)]
async fn test_profile_toggles_voice_and_sounds() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('p'));
    h.recorder.clear();

    h.press(KeyCode::Char('v'));
    assert!(!h.app.session().settings().voice);
    assert_eq!(h.recorder.events(), vec![Emitted::Cancelled]);

    h.press(KeyCode::Char('s'));
    assert!(!h.app.session().settings().sounds);

    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Esc);
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('3'));
    assert_eq!(h.recorder.events(), vec![Emitted::Cancelled]);
    assert_eq!(h.progress().math, 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_resumes_route_at_first_question() {
    let storage = MemoryStorage::new();
    {
        let mut h = Harness::new(storage.clone());
        h.type_text("Ava");
        h.press(KeyCode::Enter);
        h.press(KeyCode::Char('3'));
        h.press(KeyCode::Char('3'));
        h.deliver_advance().await;
        h.press(KeyCode::Char('q'));
        assert!(!h.app.should_quit());
        handle_key(
            &mut h.app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(h.app.should_quit());
    }
    assert_eq!(storage.raw(ROUTE_KEY).as_deref(), Some("\"quiz\""));

    let h = Harness::new(storage);
    assert_eq!(h.app.session().route(), Route::Quiz);
    assert_eq!(h.index(), 0);
    assert_eq!(h.progress().quiz, 1);
    assert_eq!(h.recorder.spoken(), vec!["Quiz: Which is a mammal?"]);
}

#[tokio::test(start_paused = true)]
async fn test_key_release_is_ignored() {
    let mut h = Harness::logged_in();
    let mut release = KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;
    handle_key(&mut h.app, release);

    assert_eq!(h.app.session().route(), Route::Dashboard);
}

#[tokio::test(start_paused = true)]
async fn test_dashboard_selection_opens_module() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Right);
    h.press(KeyCode::Right);
    h.press(KeyCode::Right);
    assert_eq!(h.app.dashboard_selection, 2);
    h.press(KeyCode::Left);
    h.press(KeyCode::Enter);

    assert_eq!(h.app.session().route(), Route::English);
}

#[tokio::test(start_paused = true)]
async fn test_answers_only_touch_their_own_counter() {
    for module in ModuleKind::ALL {
        let mut h = Harness::logged_in();
        h.app.navigate(module.route());

        h.answer(false);
        assert_eq!(h.progress(), ProgressCounters::default(), "{:?} wrong", module);
        h.deliver_advance().await;

        h.answer(true);
        let mut expected = ProgressCounters::default();
        expected.award(module);
        assert_eq!(h.progress(), expected, "{:?} right", module);
    }
}

#[tokio::test(start_paused = true)]
async fn test_quit_lands_queued_writes() {
    let mut h = Harness::logged_in();
    h.press(KeyCode::Char('1'));
    h.press(KeyCode::Char('3'));

    h.app.quit();

    assert!(h.app.should_quit());
    assert!(!h.app.has_pending_advance());
    assert_eq!(h.storage.raw(ROUTE_KEY).as_deref(), Some("\"math\""));
    assert_eq!(
        h.storage.raw(PROGRESS_KEY).as_deref(),
        Some("{\"math\":1,\"english\":0,\"quiz\":0}")
    );
}

