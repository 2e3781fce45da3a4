use crate::runner::{ModuleRunner, Phase};
use crate::ui::layout::{calculate_module_chunks, grid_cells};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const CHOICE_COLUMNS: usize = 2;

pub fn draw_module(f: &mut Frame, runner: &ModuleRunner, area: Rect) {
    let layout = calculate_module_chunks(area);
    let kind = runner.kind();
    let question = runner.current();

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            kind.title(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  Question {} / {}", runner.index() + 1, runner.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    f.render_widget(title, layout.title_area);

    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        question.prompt,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if let Some(detail) = question.detail {
        text.push_line(Line::from(detail));
    }
    let prompt = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(prompt, layout.question_area);

    if kind.is_free_text() {
        draw_text_answer(f, runner, layout.answer_area);
    } else {
        draw_choices(f, runner, layout.answer_area);
    }

    draw_result(f, runner.phase(), layout.result_area);
}

fn draw_choices(f: &mut Frame, runner: &ModuleRunner, area: Rect) {
    let choices = runner.current().choices;
    let rows = choices.len().div_ceil(CHOICE_COLUMNS);
    let cells = grid_cells(area, rows, CHOICE_COLUMNS);
    let evaluating = runner.is_evaluating();

    for (i, (choice, cell)) in choices.iter().zip(cells).enumerate() {
        let selected = i == runner.selected_choice;
        let style = if selected && !evaluating {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if evaluating {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let border = if selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let button = Paragraph::new(Span::styled(choice.to_string(), style))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!("{}", i + 1)),
            );
        f.render_widget(button, cell);
    }
}

fn draw_text_answer(f: &mut Frame, runner: &ModuleRunner, area: Rect) {
    let input = &runner.input;
    let content = if input.buffer.is_empty() {
        Span::styled(
            "Type your answer",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::from(input.buffer.clone())
    };

    let answer_area = Rect {
        height: area.height.min(3),
        ..area
    };
    let answer = Paragraph::new(Line::from(content))
        .block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(answer, answer_area);

    if !runner.is_evaluating() && answer_area.height >= 3 {
        let cursor_x = answer_area.x + 1 + input.cursor_column() as u16;
        let cursor_y = answer_area.y + 1;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

fn draw_result(f: &mut Frame, phase: &Phase, area: Rect) {
    let (text, style) = match phase {
        Phase::Evaluating { correct: true, label } => (
            label.as_str(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Phase::Evaluating { correct: false, label } => (
            label.as_str(),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Phase::Presenting => ("", Style::default()),
    };

    let result = Paragraph::new(Span::styled(text, style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(result, area);
}
