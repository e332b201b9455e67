//! Weather card rendering
//!
//! Cards come in two layouts: the expanded card for the featured city and
//! the compact card used for every other city in the grid.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::data::WeatherRecord;
use crate::units::Units;

/// Height of the expanded featured card, borders included
pub const FEATURED_CARD_HEIGHT: u16 = 10;

/// Height of a compact card, borders included
pub const CARD_HEIGHT: u16 = 8;

/// Color for temperature (warmer = more red, cooler = more blue)
pub fn temperature_color(temp_c: f64) -> Color {
    if temp_c >= 30.0 {
        Color::Red
    } else if temp_c >= 25.0 {
        Color::LightRed
    } else if temp_c >= 20.0 {
        Color::Yellow
    } else if temp_c >= 10.0 {
        Color::Green
    } else if temp_c >= 0.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{:<11}", text), Style::default().fg(Color::DarkGray))
}

fn temperature_line(record: &WeatherRecord, units: Units) -> Line<'static> {
    let current = &record.current;
    Line::from(vec![
        Span::raw(format!("{} ", record.theme().icon())),
        Span::styled(
            units.temperature(current),
            Style::default()
                .fg(temperature_color(current.temp_c))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", units.secondary_temperature(current)),
            Style::default().fg(Color::Gray),
        ),
    ])
}

/// Renders the expanded card for the featured city
pub fn render_featured(
    frame: &mut Frame,
    area: Rect,
    record: &WeatherRecord,
    units: Units,
    accent: Color,
) {
    let current = &record.current;

    let lines = vec![
        Line::from(vec![
            Span::styled(
                record.name().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", record.place()), Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(
            record.formatted_local_time(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        temperature_line(record, units),
        Line::from(vec![
            Span::styled(current.condition.text.clone(), Style::default().fg(Color::White)),
            Span::styled(
                format!("  {}", units.feels_like(current)),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label("Humidity"),
            Span::raw(format!("{:<14}", format!("{}%", current.humidity))),
            label("Wind"),
            Span::raw(units.wind(current)),
        ]),
        Line::from(vec![
            label("Visibility"),
            Span::raw(format!("{:<14}", units.visibility(current))),
            label("Pressure"),
            Span::raw(units.pressure(current)),
        ]),
    ];

    let block = Block::default()
        .title(" Featured ")
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(accent));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders a compact card; `highlighted` marks the card under the cursor
pub fn render_card(
    frame: &mut Frame,
    area: Rect,
    record: &WeatherRecord,
    units: Units,
    highlighted: bool,
) {
    let current = &record.current;

    let lines = vec![
        Line::from(Span::styled(
            record.name().to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(record.place(), Style::default().fg(Color::Gray))),
        temperature_line(record, units),
        Line::from(current.condition.text.clone()),
        Line::from(vec![label("Humidity"), Span::raw(format!("{}%", current.humidity))]),
        Line::from(vec![label("Wind"), Span::raw(units.wind(current))]),
    ];

    let border_style = if highlighted {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
