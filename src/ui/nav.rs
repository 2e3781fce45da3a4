use crate::app::App;
use crate::models::{APP_NAME, Route};
use crate::utils::truncate_string;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const MAX_NAME_WIDTH: usize = 24;

pub fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Spans for a help line such as `Enter Submit  Esc Dashboard`.
pub fn help_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(*key, key_style()),
                Span::from(format!(" {}  ", label)),
            ]
        })
        .collect();
    Line::from(spans)
}

pub fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let user = app.session().user();
    let greeting = if user.onboarded {
        format!("Hello, {} 👋", truncate_string(&user.name, MAX_NAME_WIDTH))
    } else {
        "Welcome!".to_string()
    };

    let line = Line::from(vec![
        Span::styled(
            APP_NAME,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from("  "),
        Span::styled(greeting, Style::default().fg(Color::Gray)),
    ]);

    let header = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

pub fn draw_nav(f: &mut Frame, app: &App, area: Rect) {
    let current = app.session().route();
    let mut spans = Vec::new();

    for route in Route::ALL {
        let style = if route == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", route.label()), style));
        spans.push(Span::from(" "));
    }

    spans.push(Span::styled(
        format!("  ★ {}", app.session().progress().total()),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));

    let nav = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(nav, area);
}

pub fn draw_help(f: &mut Frame, line: Line<'static>, area: Rect) {
    let help = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Keys"));
    f.render_widget(help, area);
}
