use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct ScreenLayout {
    pub header_area: Rect,
    pub nav_area: Rect,
    pub body_area: Rect,
    pub help_area: Rect,
}

pub struct ModuleLayout {
    pub title_area: Rect,
    pub question_area: Rect,
    pub answer_area: Rect,
    pub result_area: Rect,
}

pub struct OnboardLayout {
    pub intro_area: Rect,
    pub name_area: Rect,
    pub settings_area: Rect,
}

pub fn calculate_screen_chunks(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    ScreenLayout {
        header_area: chunks[0],
        nav_area: chunks[1],
        body_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_module_chunks(area: Rect) -> ModuleLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    ModuleLayout {
        title_area: chunks[0],
        question_area: chunks[1],
        answer_area: chunks[2],
        result_area: chunks[3],
    }
}

pub fn calculate_onboard_chunks(area: Rect) -> OnboardLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(area);

    OnboardLayout {
        intro_area: chunks[0],
        name_area: chunks[1],
        settings_area: chunks[2],
    }
}

/// Split `area` into a grid of `rows` x `cols` equal cells, row-major.
pub fn grid_cells(area: Rect, rows: usize, cols: usize) -> Vec<Rect> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
                .split(*row)
                .to_vec()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_layout() {
        let area = Rect::new(0, 0, 80, 30);
        let layout = calculate_screen_chunks(area);

        // Margin 1 leaves 28 rows: 3 + 3 + 3 fixed, the body takes the rest.
        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.nav_area.height, 3);
        assert_eq!(layout.help_area.height, 3);
        assert_eq!(layout.body_area.height, 19);
        assert_eq!(layout.body_area.width, 78);
    }

    #[test]
    fn test_module_layout() {
        let area = Rect::new(0, 0, 78, 19);
        let layout = calculate_module_chunks(area);

        assert_eq!(layout.title_area.height, 1);
        assert_eq!(layout.question_area.height, 4);
        assert_eq!(layout.result_area.height, 3);
        assert_eq!(layout.answer_area.height, 11);
    }

    #[test]
    fn test_grid_cells_cover_area() {
        let area = Rect::new(0, 0, 40, 10);
        let cells = grid_cells(area, 2, 2);

        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], Rect::new(0, 0, 20, 5));
        assert_eq!(cells[3], Rect::new(20, 5, 20, 5));
        assert!(grid_cells(area, 0, 2).is_empty());
    }
}
