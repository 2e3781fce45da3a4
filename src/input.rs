use crate::app::{App, OnboardField};
use crate::models::{ModuleKind, Route};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.is_onboarding() {
        handle_onboarding_input(app, key);
        return;
    }

    let route = app.session().route();
    match key.code {
        KeyCode::Tab => {
            app.navigate(route.next());
            return;
        }
        KeyCode::BackTab => {
            app.navigate(route.prev());
            return;
        }
        KeyCode::Esc => {
            app.navigate(Route::Dashboard);
            return;
        }
        _ => {}
    }

    match route {
        Route::Dashboard => handle_dashboard_input(app, key),
        Route::Math | Route::Quiz => handle_choice_input(app, key),
        Route::English => handle_text_input(app, key),
        Route::Profile => handle_profile_input(app, key),
    }
}

fn handle_onboarding_input(app: &mut App, key: KeyEvent) {
    let focus = app.onboarding.focus;
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab => app.onboarding.focus = focus.next(),
        KeyCode::BackTab => app.onboarding.focus = focus.prev(),
        KeyCode::Enter => {
            app.login();
        }
        KeyCode::Char(' ') if focus == OnboardField::Voice => app.toggle_voice(),
        KeyCode::Char(' ') if focus == OnboardField::Sounds => app.toggle_sounds(),
        KeyCode::Char(c) if focus == OnboardField::Name => app.onboarding.name.insert(c),
        KeyCode::Backspace if focus == OnboardField::Name => app.onboarding.name.backspace(),
        KeyCode::Left if focus == OnboardField::Name => app.onboarding.name.left(),
        KeyCode::Right if focus == OnboardField::Name => app.onboarding.name.right(),
        _ => {}
    }
}

fn handle_dashboard_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Up => app.select_dashboard(-1),
        KeyCode::Right | KeyCode::Down => app.select_dashboard(1),
        KeyCode::Enter => app.open_selected_module(),
        KeyCode::Char(c @ '1'..='3') => {
            let i = c as usize - '1' as usize;
            app.dashboard_selection = i;
            app.navigate(ModuleKind::ALL[i].route());
        }
        KeyCode::Char('p') => app.navigate(Route::Profile),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_choice_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left => move_selection(app, -1, 0),
        KeyCode::Right => move_selection(app, 1, 0),
        KeyCode::Up => move_selection(app, 0, -1),
        KeyCode::Down => move_selection(app, 0, 1),
        KeyCode::Enter => app.submit(),
        KeyCode::Char(c @ '1'..='9') => app.pick(c as usize - '1' as usize),
        _ => {}
    }
}

fn move_selection(app: &mut App, dx: isize, dy: isize) {
    if let Some(runner) = app.runner_mut() {
        runner.move_selection(dx, dy);
    }
}

fn handle_text_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Enter {
        app.submit();
        return;
    }
    let Some(runner) = app.runner_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(c) => runner.input.insert(c),
        KeyCode::Backspace => runner.input.backspace(),
        KeyCode::Left => runner.input.left(),
        KeyCode::Right => runner.input.right(),
        _ => {}
    }
}

fn handle_profile_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('v') => app.toggle_voice(),
        KeyCode::Char('s') => app.toggle_sounds(),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}
