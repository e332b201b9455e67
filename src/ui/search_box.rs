//! Search box, its suggestion dropdown and the location button

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

/// Renders the search input and the "use my location" button side by side
pub fn render_search_bar(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(26)])
        .split(area);

    let focused = app.mode == InputMode::Search;
    let content = if app.search.input.is_empty() && !focused {
        Line::from(Span::styled(
            "Search for any city... (press /)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::styled(
            app.search.input.clone(),
            Style::default().fg(Color::White),
        )];
        if focused {
            spans.push(Span::styled("\u{258F}", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    };

    let border_color = if focused { Color::Yellow } else { Color::Gray };
    let input = Paragraph::new(content).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(input, chunks[0]);

    let location = Paragraph::new(Line::from(vec![
        Span::styled("l", Style::default().fg(Color::Yellow)),
        Span::raw(" Use My Location"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    );
    frame.render_widget(location, chunks[1]);
}

/// Renders the suggestion dropdown just below `anchor`, over whatever is there
pub fn render_suggestions(frame: &mut Frame, anchor: Rect, app: &App) {
    if app.mode != InputMode::Search || !app.search.is_open() {
        return;
    }

    let frame_area = frame.area();
    let height = (app.search.suggestions.len() as u16 + 2).min(
        frame_area
            .height
            .saturating_sub(anchor.y + anchor.height),
    );
    if height < 3 {
        return;
    }
    let area = Rect {
        x: anchor.x,
        y: anchor.y + anchor.height,
        width: anchor.width.min(40),
        height,
    };

    let items: Vec<ListItem> = app
        .search
        .suggestions
        .iter()
        .map(|name| ListItem::new(name.to_string()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black).fg(Color::White))
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(app.search.highlighted);

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_placeholder_when_idle() {
        let app = App::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 3)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_search_bar(frame, area, &app);
            })
            .unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Search for any city"));
        assert!(content.contains("Use My Location"));
    }

    #[test]
    fn test_suggestions_render_below_anchor() {
        let mut app = App::new();
        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
        for c in "tor".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|frame| {
                let anchor = Rect::new(0, 0, 54, 3);
                render_search_bar(frame, anchor, &app);
                render_suggestions(frame, anchor, &app);
            })
            .unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("tor"));
        assert!(content.contains("Toronto"));
        assert!(content.contains("Victoria"));
    }

    #[test]
    fn test_no_dropdown_outside_search_mode() {
        let app = App::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal
            .draw(|frame| {
                render_suggestions(frame, Rect::new(0, 0, 54, 3), &app);
            })
            .unwrap();

        assert!(!buffer_text(&terminal).contains("Toronto"));
    }
}
