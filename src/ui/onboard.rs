use crate::app::{App, OnboardField};
use crate::ui::layout::calculate_onboard_chunks;
use crate::ui::nav::key_style;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn checkbox(checked: bool, label: &str, focused: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("{} {}", mark, label), style))
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw_onboard(f: &mut Frame, app: &App, area: Rect) {
    let layout = calculate_onboard_chunks(area);
    let form = &app.onboarding;

    let mut intro = Text::default();
    intro.push_line(Line::from(Span::styled(
        "Quick setup",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    intro.push_line(Line::from(
        "Enter the learner's name to save progress and personalize the app.",
    ));
    f.render_widget(
        Paragraph::new(intro).wrap(Wrap { trim: true }),
        layout.intro_area,
    );

    let name_focused = form.focus == OnboardField::Name;
    let name_text = if form.name.buffer.is_empty() {
        Span::styled(
            "Their name",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::from(form.name.buffer.clone())
    };
    let name = Paragraph::new(Line::from(name_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Name")
            .border_style(focus_border(name_focused)),
    );
    f.render_widget(name, layout.name_area);

    if name_focused {
        let cursor_x = layout.name_area.x + 1 + form.name.cursor_column() as u16;
        let cursor_y = layout.name_area.y + 1;
        f.set_cursor_position((cursor_x, cursor_y));
    }

    let settings = app.session().settings();
    let mut text = Text::default();
    text.push_line(checkbox(
        settings.voice,
        "Enable voice (reads questions aloud)",
        form.focus == OnboardField::Voice,
    ));
    text.push_line(checkbox(
        settings.sounds,
        "Enable sound effects",
        form.focus == OnboardField::Sounds,
    ));
    text.push_line(Line::from(""));

    let start_style = if form.name.buffer.trim().is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        key_style()
    };
    text.push_line(Line::from(vec![
        Span::styled("Enter", start_style),
        Span::styled(" Start", start_style),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Accessibility")
        .border_style(focus_border(!name_focused));
    f.render_widget(Paragraph::new(text).block(block), layout.settings_area);
}
