pub mod layout;
mod dashboard;
mod module;
mod nav;
mod onboard;
mod profile;

use crate::app::App;
use crate::models::Route;
use crate::ui::layout::calculate_screen_chunks;
use ratatui::{Frame, text::Line};

/// Render the whole screen for the current state of `app`.
pub fn draw(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    nav::draw_header(f, app, layout.header_area);

    if app.is_onboarding() {
        // The tab bar stays hidden until a profile exists.
        let body = layout.nav_area.union(layout.body_area);
        onboard::draw_onboard(f, app, body);
        nav::draw_help(f, onboard_help(), layout.help_area);
        return;
    }

    nav::draw_nav(f, app, layout.nav_area);

    let route = app.session().route();
    match route {
        Route::Dashboard => dashboard::draw_dashboard(f, app, layout.body_area),
        Route::Profile => profile::draw_profile(f, app, layout.body_area),
        Route::Math | Route::English | Route::Quiz => {
            if let Some(runner) = app.runner() {
                module::draw_module(f, runner, layout.body_area);
            }
        }
    }
    nav::draw_help(f, route_help(route), layout.help_area);
}

fn onboard_help() -> Line<'static> {
    nav::help_line(&[
        ("Tab", "Next field"),
        ("Space", "Toggle"),
        ("Enter", "Start"),
        ("Esc", "Quit"),
    ])
}

fn route_help(route: Route) -> Line<'static> {
    match route {
        Route::Dashboard => nav::help_line(&[
            ("←/→", "Select"),
            ("Enter", "Open"),
            ("1-3", "Module"),
            ("p", "Profile"),
            ("l", "Logout"),
            ("q", "Quit"),
        ]),
        Route::Math | Route::Quiz => nav::help_line(&[
            ("Arrows", "Choose"),
            ("Enter", "Answer"),
            ("1-4", "Pick"),
            ("Tab", "Next screen"),
            ("Esc", "Dashboard"),
        ]),
        Route::English => nav::help_line(&[
            ("Enter", "Submit"),
            ("Tab", "Next screen"),
            ("Esc", "Dashboard"),
        ]),
        Route::Profile => nav::help_line(&[
            ("v", "Voice"),
            ("s", "Sounds"),
            ("l", "Logout"),
            ("Esc", "Dashboard"),
        ]),
    }
}
