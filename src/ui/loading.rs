//! First-load spinner

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::app::App;

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner glyph for an animation frame
pub fn spinner(frame_index: usize) -> char {
    SPINNER_FRAMES[frame_index % SPINNER_FRAMES.len()]
}

/// Renders a loading message while the first batch is being fetched
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.dashboard.theme().background())),
        area,
    );

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let message = format!("{} Loading weather data...", spinner(app.spinner_frame));
    let loading_text = Paragraph::new(message)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}
