use crate::app::App;
use crate::models::ModuleKind;
use crate::ui::layout::grid_cells;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const PARENT_TIP: &str = "Encourage short daily sessions (10-20 minutes). \
Celebrate stars and progress. Small rewards work great!";

fn stars_label(count: u32) -> String {
    if count == 1 {
        "1 star".to_string()
    } else {
        format!("{} stars", count)
    }
}

pub fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    let progress = app.session().progress();
    let cells = grid_cells(chunks[0], 1, ModuleKind::ALL.len());

    for (i, (module, cell)) in ModuleKind::ALL.iter().zip(cells).enumerate() {
        let selected = i == app.dashboard_selection;
        let border = if selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let mut text = Text::default();
        text.push_line(Line::from(Span::styled(module.title(), title_style)));
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            stars_label(progress.get(*module)),
            Style::default().fg(Color::Gray),
        )));

        let card = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!("[{}]", i + 1)),
            );
        f.render_widget(card, cell);
    }

    let tip = Paragraph::new(PARENT_TIP)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title("Tip for parents"),
        );
    f.render_widget(tip, chunks[1]);
}
