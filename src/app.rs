//! Application state management for citywx
//!
//! This module holds the dashboard together with the purely local UI
//! state (search text, cursors, overlays), translates key presses into
//! dashboard operations and queues the resulting network effects for the
//! main loop to spawn.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::cli::StartupConfig;
use crate::dashboard::{DashboardState, Effect, Event};
use crate::data::{CITY_CATALOG, DEFAULT_CITIES};
use crate::suggest::suggest;
use crate::units::Units;

/// Where key presses go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigating cards and quick-select buttons
    #[default]
    Browse,
    /// Typing into the search box
    Search,
}

/// Search box text and its type-ahead suggestions
#[derive(Debug, Clone, Default)]
pub struct SearchBox {
    pub input: String,
    pub suggestions: Vec<&'static str>,
    /// Index into `suggestions` picked with the arrow keys
    pub highlighted: Option<usize>,
}

impl SearchBox {
    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    fn push(&mut self, c: char) {
        self.input.push(c);
        self.update_suggestions();
    }

    fn backspace(&mut self) {
        self.input.pop();
        self.update_suggestions();
    }

    fn update_suggestions(&mut self) {
        self.suggestions = suggest(&self.input, &CITY_CATALOG);
        self.highlighted = None;
    }

    fn close_suggestions(&mut self) {
        self.suggestions.clear();
        self.highlighted = None;
    }

    fn highlight_next(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() - 1;
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
    }

    fn highlight_previous(&mut self) {
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Text to search for: the highlighted suggestion, else what was typed
    fn submission(&self) -> String {
        self.highlighted
            .and_then(|i| self.suggestions.get(i))
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.input.trim().to_string())
    }

    fn clear(&mut self) {
        self.input.clear();
        self.close_suggestions();
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Weather records, featured city, phase and theme
    pub dashboard: DashboardState,
    pub mode: InputMode,
    pub search: SearchBox,
    /// Index of the highlighted card among the non-featured cards
    pub card_cursor: usize,
    /// Primary units for cards
    pub units: Units,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Whether the background refresh timer is running
    pub auto_refresh: bool,
    /// Timestamp of last applied fetch
    pub last_refresh: Option<DateTime<Local>>,
    /// Animation frame for the loading spinner
    pub spinner_frame: usize,
    /// Effects waiting to be spawned by the main loop
    effects: Vec<Effect>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App featuring New York with default settings
    pub fn new() -> Self {
        Self {
            dashboard: DashboardState::new(&DEFAULT_CITIES, "New York"),
            mode: InputMode::Browse,
            search: SearchBox::default(),
            card_cursor: 0,
            units: Units::default(),
            show_help: false,
            should_quit: false,
            auto_refresh: true,
            last_refresh: None,
            spinner_frame: 0,
            effects: Vec::new(),
        }
    }

    /// Creates a new App instance with the given startup configuration.
    pub fn with_startup_config(config: &StartupConfig) -> Self {
        let mut app = Self::new();
        app.dashboard = DashboardState::new(&DEFAULT_CITIES, config.featured.clone());
        app.units = config.units;
        app.auto_refresh = config.refresh.enabled;
        app
    }

    /// Queue the initial load of the default cities
    pub fn start(&mut self) {
        let effect = self.dashboard.retry();
        self.effects.push(effect);
    }

    /// Hand over queued effects to be spawned
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Apply a completed effect
    pub fn handle_event(&mut self, event: Event) {
        let fetched = matches!(event, Event::BatchLoaded { .. } | Event::CityLoaded { .. });
        if let Some(follow_up) = self.dashboard.apply(event) {
            self.effects.push(follow_up);
        }
        if fetched {
            self.last_refresh = Some(Local::now());
        }
        self.clamp_card_cursor();
    }

    /// Auto-refresh timer fired
    pub fn handle_refresh_tick(&mut self) {
        if let Some(effect) = self.dashboard.refresh() {
            debug!("auto-refreshing displayed cities");
            self.effects.push(effect);
        }
    }

    /// Advance animations
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    /// Number of standard (non-featured) cards
    pub fn other_card_count(&self) -> usize {
        self.dashboard.other_records().len()
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `/` or `s`: Focus the search box
    /// - `l`: Use my location
    /// - `1`-`6`: Feature a quick-select city
    /// - `Left`/`Right`/`Tab`: Move between cards
    /// - `Enter`: Feature the highlighted card
    /// - `r`: Retry loading the default cities
    /// - `x` or `Esc`: Dismiss the error banner
    /// - `u`: Toggle °F / °C
    /// - `?`: Toggle help
    /// - `q` or `Ctrl-C`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.mode {
            InputMode::Search => self.handle_search_key(key_event),
            InputMode::Browse => self.handle_browse_key(key_event),
        }
    }

    fn handle_browse_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.mode = InputMode::Search;
            }
            KeyCode::Char('l') => {
                let effect = self.dashboard.begin_locate();
                self.effects.push(effect);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                if let Some(city) = self.dashboard.defaults().get(index).cloned() {
                    self.dashboard.select_city(&city);
                    self.clamp_card_cursor();
                }
            }
            KeyCode::Right | KeyCode::Tab => {
                self.move_card_cursor_right();
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.move_card_cursor_left();
            }
            KeyCode::Enter => {
                self.select_highlighted_card();
            }
            KeyCode::Char('r') => {
                let effect = self.dashboard.retry();
                self.effects.push(effect);
            }
            KeyCode::Char('x') | KeyCode::Esc => {
                self.dashboard.dismiss_error();
            }
            KeyCode::Char('u') => {
                self.units = self.units.toggle();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                if self.search.is_open() {
                    self.search.close_suggestions();
                } else {
                    self.mode = InputMode::Browse;
                }
            }
            KeyCode::Enter => {
                self.submit_search();
            }
            KeyCode::Down => {
                self.search.highlight_next();
            }
            KeyCode::Up => {
                self.search.highlight_previous();
            }
            KeyCode::Backspace => {
                self.search.backspace();
            }
            KeyCode::Char(c) => {
                self.search.push(c);
            }
            _ => {}
        }
    }

    fn submit_search(&mut self) {
        let query = self.search.submission();
        if let Some(effect) = self.dashboard.begin_search(&query) {
            self.effects.push(effect);
            self.search.clear();
            self.mode = InputMode::Browse;
        }
    }

    fn select_highlighted_card(&mut self) {
        let name = self
            .dashboard
            .other_records()
            .get(self.card_cursor)
            .map(|record| record.name().to_string());
        if let Some(name) = name {
            self.dashboard.select_city(&name);
            self.card_cursor = 0;
        }
    }

    fn move_card_cursor_right(&mut self) {
        let count = self.other_card_count();
        if count == 0 {
            return;
        }
        self.card_cursor = (self.card_cursor + 1) % count;
    }

    fn move_card_cursor_left(&mut self) {
        let count = self.other_card_count();
        if count == 0 {
            return;
        }
        if self.card_cursor == 0 {
            self.card_cursor = count - 1;
        } else {
            self.card_cursor -= 1;
        }
    }

    fn clamp_card_cursor(&mut self) {
        let count = self.other_card_count();
        if self.card_cursor >= count {
            self.card_cursor = count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Phase;
    use crate::data::{sample_record, FetchError};
    use crate::theme::Theme;

    const DAY: &str = "//cdn.weatherapi.com/weather/64x64/day/113.png";

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
    }

    /// App with the default cities loaded
    fn loaded_app() -> App {
        let mut app = App::new();
        app.start();
        let seq = match app.take_effects().pop() {
            Some(Effect::FetchBatch { seq, .. }) => seq,
            other => panic!("Expected FetchBatch, got {:?}", other),
        };
        let records = DEFAULT_CITIES
            .iter()
            .map(|name| {
                let condition = if *name == "London" { "Light rain" } else { "Sunny" };
                sample_record(name, condition, DAY)
            })
            .collect();
        app.handle_event(Event::BatchLoaded {
            seq,
            records,
            notice: None,
        });
        app
    }

    #[test]
    fn test_new_app_defaults() {
        let app = App::new();
        assert_eq!(app.mode, InputMode::Browse);
        assert_eq!(app.dashboard.featured(), "New York");
        assert!(!app.should_quit);
        assert!(app.last_refresh.is_none());
    }

    #[test]
    fn test_start_queues_default_batch() {
        let mut app = App::new();
        app.start();
        let effects = app.take_effects();
        assert_eq!(effects.len(), 1);
        assert!(matches!(&effects[0], Effect::FetchBatch { queries, .. } if queries.len() == 6));
        assert!(app.dashboard.is_initial_load());
        assert!(app.take_effects().is_empty());
    }

    #[test]
    fn test_batch_event_sets_last_refresh() {
        let app = loaded_app();
        assert!(app.last_refresh.is_some());
        assert_eq!(app.dashboard.record_count(), 6);
    }

    #[test]
    fn test_q_quits() {
        let mut app = App::new();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_searching() {
        let mut app = App::new();
        app.mode = InputMode::Search;
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_quick_select_features_default_city() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('2')));
        assert_eq!(app.dashboard.featured(), "London");
        assert_eq!(app.dashboard.theme(), Theme::Rainy);
        assert!(app.take_effects().is_empty(), "selection must not fetch");
    }

    #[test]
    fn test_quick_select_out_of_range_ignored() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('9')));
        assert_eq!(app.dashboard.featured(), "New York");
    }

    #[test]
    fn test_slash_enters_search_mode() {
        let mut app = App::new();
        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.mode, InputMode::Search);
    }

    #[test]
    fn test_typing_updates_suggestions() {
        let mut app = App::new();
        app.mode = InputMode::Search;
        type_text(&mut app, "tor");
        assert_eq!(app.search.input, "tor");
        assert_eq!(app.search.suggestions, vec!["Toronto", "Victoria"]);

        app.handle_key(key_event(KeyCode::Backspace));
        app.handle_key(key_event(KeyCode::Backspace));
        app.handle_key(key_event(KeyCode::Backspace));
        assert!(app.search.input.is_empty());
        assert!(!app.search.is_open());
    }

    #[test]
    fn test_typing_q_in_search_does_not_quit() {
        let mut app = App::new();
        app.mode = InputMode::Search;
        type_text(&mut app, "qu");
        assert!(!app.should_quit);
        assert_eq!(app.search.input, "qu");
    }

    #[test]
    fn test_arrow_keys_move_through_suggestions() {
        let mut app = App::new();
        app.mode = InputMode::Search;
        type_text(&mut app, "tor");

        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.search.highlighted, Some(0));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.search.highlighted, Some(1));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.search.highlighted, Some(1), "Should stop at last suggestion");
        app.handle_key(key_event(KeyCode::Up));
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.search.highlighted, None);
    }

    #[test]
    fn test_enter_submits_highlighted_suggestion() {
        let mut app = App::new();
        app.mode = InputMode::Search;
        type_text(&mut app, "tor");
        app.handle_key(key_event(KeyCode::Down));
        app.handle_key(key_event(KeyCode::Down));
        app.handle_key(key_event(KeyCode::Enter));

        match app.take_effects().as_slice() {
            [Effect::FetchCity { query, .. }] => assert_eq!(query, "Victoria"),
            other => panic!("Expected one FetchCity, got {:?}", other),
        }
        assert!(app.search.input.is_empty());
        assert_eq!(app.mode, InputMode::Browse);
    }

    #[test]
    fn test_enter_submits_typed_text() {
        let mut app = App::new();
        app.mode = InputMode::Search;
        type_text(&mut app, "Springfield ");
        app.handle_key(key_event(KeyCode::Enter));

        match app.take_effects().as_slice() {
            [Effect::FetchCity { query, .. }] => assert_eq!(query, "Springfield"),
            other => panic!("Expected one FetchCity, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_search_submission_ignored() {
        let mut app = App::new();
        app.mode = InputMode::Search;
        type_text(&mut app, "   ");
        app.handle_key(key_event(KeyCode::Enter));

        assert!(app.take_effects().is_empty());
        assert_eq!(app.mode, InputMode::Search);
    }

    #[test]
    fn test_escape_closes_suggestions_then_search() {
        let mut app = App::new();
        app.mode = InputMode::Search;
        type_text(&mut app, "par");
        assert!(app.search.is_open());

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.search.is_open());
        assert_eq!(app.mode, InputMode::Search);
        assert_eq!(app.search.input, "par");

        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.mode, InputMode::Browse);
    }

    #[test]
    fn test_search_result_features_city() {
        let mut app = loaded_app();
        app.mode = InputMode::Search;
        type_text(&mut app, "Paris");
        app.handle_key(key_event(KeyCode::Enter));
        let seq = match app.take_effects().pop() {
            Some(Effect::FetchCity { seq, .. }) => seq,
            other => panic!("Expected FetchCity, got {:?}", other),
        };

        app.handle_event(Event::CityLoaded {
            seq,
            record: sample_record("Paris", "Overcast", DAY),
        });
        assert_eq!(app.dashboard.featured(), "Paris");
        assert_eq!(app.dashboard.theme(), Theme::Cloudy);
        assert_eq!(app.other_card_count(), 6);
    }

    #[test]
    fn test_location_key_queues_locate() {
        let mut app = App::new();
        app.handle_key(key_event(KeyCode::Char('l')));
        assert!(matches!(app.take_effects().as_slice(), [Effect::Locate { .. }]));
    }

    #[test]
    fn test_location_failure_queues_fallback() {
        let mut app = App::new();
        app.handle_key(key_event(KeyCode::Char('l')));
        let seq = match app.take_effects().pop() {
            Some(Effect::Locate { seq }) => seq,
            other => panic!("Expected Locate, got {:?}", other),
        };

        app.handle_event(Event::LocationFailed {
            seq,
            error: crate::data::LocationError::Unavailable,
        });
        assert!(matches!(
            app.take_effects().as_slice(),
            [Effect::FetchBatch { notice: Some(_), .. }]
        ));
    }

    #[test]
    fn test_card_cursor_wraps() {
        let mut app = loaded_app();
        assert_eq!(app.other_card_count(), 5);

        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.card_cursor, 4, "Should wrap to last card");
        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.card_cursor, 0, "Should wrap to first card");
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.card_cursor, 1);
    }

    #[test]
    fn test_enter_features_highlighted_card() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Right));
        app.handle_key(key_event(KeyCode::Right));
        app.handle_key(key_event(KeyCode::Enter));

        // other cards are London, Tokyo, Sydney, ... so index 2 is Sydney
        assert_eq!(app.dashboard.featured(), "Sydney");
        assert_eq!(app.card_cursor, 0);
    }

    #[test]
    fn test_retry_queues_default_batch() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        match app.take_effects().as_slice() {
            [Effect::FetchBatch { queries, .. }] => assert_eq!(queries, &DEFAULT_CITIES.to_vec()),
            other => panic!("Expected FetchBatch, got {:?}", other),
        }
        assert!(app.dashboard.is_loading());
    }

    #[test]
    fn test_dismiss_error() {
        let mut app = App::new();
        app.start();
        let seq = match app.take_effects().pop() {
            Some(Effect::FetchBatch { seq, .. }) => seq,
            other => panic!("Expected FetchBatch, got {:?}", other),
        };
        app.handle_event(Event::BatchFailed {
            seq,
            error: FetchError::Failed("London".to_string()),
            notice: None,
        });
        assert!(app.dashboard.error().is_some());

        app.handle_key(key_event(KeyCode::Char('x')));
        assert_eq!(app.dashboard.phase(), &Phase::Idle);
    }

    #[test]
    fn test_refresh_tick_refetches_displayed_cities() {
        let mut app = App::new();
        app.handle_refresh_tick();
        assert!(app.take_effects().is_empty(), "nothing displayed yet");

        let mut app = loaded_app();
        app.handle_refresh_tick();
        assert!(matches!(app.take_effects().as_slice(), [Effect::FetchBatch { .. }]));
    }

    #[test]
    fn test_units_toggle() {
        let mut app = App::new();
        assert_eq!(app.units, Units::Imperial);
        app.handle_key(key_event(KeyCode::Char('u')));
        assert_eq!(app.units, Units::Metric);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = App::new();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('l')));
        assert!(app.take_effects().is_empty());

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn test_with_startup_config() {
        let cli = <crate::cli::Cli as clap::Parser>::parse_from([
            "citywx",
            "--api-key",
            "k",
            "--featured",
            "Tokyo",
            "--units",
            "c",
            "--no-refresh",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        let app = App::with_startup_config(&config);

        assert_eq!(app.dashboard.featured(), "Tokyo");
        assert_eq!(app.units, Units::Metric);
        assert!(!app.auto_refresh);
    }
}
