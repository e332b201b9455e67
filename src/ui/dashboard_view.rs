//! Main dashboard screen rendering
//!
//! Lays out the header, search bar, quick-select buttons, error banner and
//! the card grid, all painted over the featured city's theme background.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::search_box::{render_search_bar, render_suggestions};
use super::weather_card::{render_card, render_featured, CARD_HEIGHT, FEATURED_CARD_HEIGHT};
use crate::app::App;

/// Cards per row in the grid for a given width
pub fn grid_columns(width: u16) -> usize {
    match width {
        0..=59 => 1,
        60..=99 => 2,
        100..=139 => 3,
        _ => 4,
    }
}

/// Renders the whole dashboard
pub fn render_dashboard(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let theme = app.dashboard.theme();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background())),
        area,
    );

    let banner_height = if app.dashboard.error().is_some() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(3),             // Search bar
            Constraint::Length(1),             // Quick-select buttons
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(0),                // Cards
            Constraint::Length(1),             // Help line
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_search_bar(frame, chunks[1], app);
    render_quick_buttons(frame, app, chunks[2]);
    if banner_height > 0 {
        render_error_banner(frame, app, chunks[3]);
    }
    render_cards(frame, app, chunks[4]);
    render_help(frame, chunks[5]);

    // Dropdown goes last so it sits above the cards
    render_suggestions(frame, chunks[1], app);
}

/// Renders the title with theme and freshness information
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = app.dashboard.theme();

    let mut spans = vec![
        Span::styled(
            format!("{} {}", theme.icon(), theme.as_str()),
            Style::default().fg(theme.accent()),
        ),
        Span::styled(
            format!("  │ units {}", app.units.label()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            if app.auto_refresh {
                "  │ auto-refresh on"
            } else {
                "  │ auto-refresh off"
            },
            Style::default().fg(Color::Gray),
        ),
    ];

    if let Some(last_refresh) = app.last_refresh {
        let mins_ago = (Local::now() - last_refresh).num_minutes();
        let freshness = if mins_ago < 1 {
            "  │ updated just now".to_string()
        } else {
            format!("  │ updated {}m ago", mins_ago)
        };
        spans.push(Span::styled(freshness, Style::default().fg(Color::DarkGray)));
    }

    let block = Block::default()
        .title(Span::styled(
            " Global Weather Dashboard ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent()));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Renders the numbered quick-select buttons for the default cities
fn render_quick_buttons(frame: &mut Frame, app: &App, area: Rect) {
    let accent = app.dashboard.theme().accent();
    let mut spans = Vec::new();

    for (i, city) in app.dashboard.defaults().iter().enumerate() {
        let style = if app.dashboard.is_featured(city) {
            Style::default()
                .fg(Color::Black)
                .bg(accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, city), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the error message with its recovery keys
fn render_error_banner(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.dashboard.error() else {
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::White),
        )),
        Line::from(vec![
            Span::styled("r", Style::default().fg(Color::Yellow)),
            Span::raw(" Try Again  "),
            Span::styled("x", Style::default().fg(Color::Yellow)),
            Span::raw(" Dismiss"),
        ]),
    ];

    let block = Block::default()
        .title(" \u{26A0} Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Renders the featured card followed by a grid of the remaining cards
fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let mut remaining = area;

    if let Some(record) = app.dashboard.featured_record().filter(|_| remaining.height > 0) {
        let height = FEATURED_CARD_HEIGHT.min(remaining.height);
        let featured_area = Rect { height, ..remaining };
        render_featured(
            frame,
            featured_area,
            record,
            app.units,
            app.dashboard.theme().accent(),
        );
        remaining.y += height;
        remaining.height -= height;
    }

    let others = app.dashboard.other_records();
    if others.is_empty() || remaining.height < CARD_HEIGHT {
        if app.dashboard.record_count() == 0 && !app.dashboard.is_loading() {
            let hint = Paragraph::new("No weather loaded yet. Press r to load the default cities.")
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(hint, remaining);
        }
        return;
    }

    let columns = grid_columns(remaining.width);
    let visible_rows = (remaining.height / CARD_HEIGHT) as usize;
    let cursor_row = app.card_cursor / columns;
    // Scroll so the highlighted card stays on screen
    let first_row = cursor_row.saturating_sub(visible_rows.saturating_sub(1));

    let column_width = remaining.width / columns as u16;
    for (i, record) in others.iter().enumerate() {
        let row = i / columns;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = (i % columns) as u16;
        let card_area = Rect {
            x: remaining.x + col * column_width,
            y: remaining.y + (row - first_row) as u16 * CARD_HEIGHT,
            width: column_width,
            height: CARD_HEIGHT,
        };
        render_card(frame, card_area, record, app.units, i == app.card_cursor);
    }
}

/// Renders the key help at the bottom of the screen
fn render_help(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(" Search  "),
        Span::styled("1-6", Style::default().fg(Color::Yellow)),
        Span::raw(" Quick select  "),
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" Cards  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Feature  "),
        Span::styled("l", Style::default().fg(Color::Yellow)),
        Span::raw(" Location  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Effect, Event};
    use crate::data::{sample_record, FetchError, DEFAULT_CITIES};
    use ratatui::{backend::TestBackend, Terminal};

    const DAY: &str = "//cdn.weatherapi.com/weather/64x64/day/113.png";

    fn batch_seq(app: &mut App) -> u64 {
        match app.take_effects().pop() {
            Some(Effect::FetchBatch { seq, .. }) => seq,
            other => panic!("Expected FetchBatch, got {:?}", other),
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new();
        app.start();
        let seq = batch_seq(&mut app);
        app.handle_event(Event::BatchLoaded {
            seq,
            records: DEFAULT_CITIES
                .iter()
                .map(|name| sample_record(name, "Partly cloudy", DAY))
                .collect(),
            notice: None,
        });
        app
    }

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render_dashboard(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_title_and_theme_rendered() {
        let content = render_to_string(&loaded_app(), 120, 40);
        assert!(content.contains("Global Weather Dashboard"));
        assert!(content.contains("cloudy"));
    }

    #[test]
    fn test_featured_and_grid_cards_rendered() {
        let content = render_to_string(&loaded_app(), 120, 40);
        assert!(content.contains("Featured"));
        for city in DEFAULT_CITIES {
            assert!(content.contains(city), "{} should be on screen", city);
        }
    }

    #[test]
    fn test_error_banner_rendered() {
        let mut app = loaded_app();
        app.handle_key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('r'),
            crossterm::event::KeyModifiers::NONE,
        ));
        let seq = batch_seq(&mut app);
        app.handle_event(Event::BatchFailed {
            seq,
            error: FetchError::Provider(
                "API key has exceeded calls per month quota.".to_string(),
            ),
            notice: None,
        });

        let content = render_to_string(&app, 120, 40);
        assert!(content.contains("Error"));
        assert!(content.contains("exceeded calls per month"));
        assert!(content.contains("Try Again"));
        // previous cards stay visible
        assert!(content.contains("Featured"));
    }

    #[test]
    fn test_empty_dashboard_hint() {
        let mut app = App::new();
        app.start();
        let seq = batch_seq(&mut app);
        app.handle_event(Event::BatchFailed {
            seq,
            error: FetchError::Failed("Tokyo".to_string()),
            notice: None,
        });

        let content = render_to_string(&app, 100, 30);
        assert!(content.contains("Failed to fetch weather for Tokyo"));
        assert!(content.contains("No weather loaded yet"));
    }

    #[test]
    fn test_help_text_is_rendered() {
        let content = render_to_string(&loaded_app(), 120, 40);
        assert!(content.contains("Search"));
        assert!(content.contains("Quick select"));
        assert!(content.contains("Quit"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let app = loaded_app();
        let _ = render_to_string(&app, 20, 8);
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(40), 1);
        assert_eq!(grid_columns(80), 2);
        assert_eq!(grid_columns(120), 3);
        assert_eq!(grid_columns(200), 4);
    }
}
