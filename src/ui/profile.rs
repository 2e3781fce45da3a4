use crate::app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn toggle_line(on: bool, label: &str, key: &'static str) -> Line<'static> {
    let mark = if on { "[x]" } else { "[ ]" };
    Line::from(vec![
        Span::from(format!("{} {}  ", mark, label)),
        Span::styled(format!("({})", key), Style::default().fg(Color::DarkGray)),
    ])
}

pub fn draw_profile(f: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let settings = session.settings();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut text = Text::default();
    text.push_line(Line::from(vec![
        Span::styled("Name: ", bold),
        Span::from(session.user().name.clone()),
    ]));
    text.push_line(Line::from(vec![
        Span::styled("Stars earned: ", bold),
        Span::styled(
            session.progress().total().to_string(),
            Style::default().fg(Color::Yellow),
        ),
    ]));
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled("Settings", bold)));
    text.push_line(toggle_line(settings.voice, "Voice (reads questions)", "v"));
    text.push_line(toggle_line(settings.sounds, "Sound effects", "s"));
    text.push_line(Line::from(Span::styled(
        format!(
            "Voice rate {:.1}, pitch {:.1}",
            settings.voice_rate, settings.voice_pitch
        ),
        Style::default().fg(Color::DarkGray),
    )));
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        "Progress is saved locally on this device.",
        Style::default().fg(Color::Gray),
    )));

    let profile = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Profile"));
    f.render_widget(profile, area);
}
