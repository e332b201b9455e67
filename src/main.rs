//! citywx - Current weather for cities around the world
//!
//! A terminal UI application that shows current conditions for a set of
//! cities, lets the user search for more and features one of them.

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::Path;
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use citywx::app::App;
use citywx::cli::{Cli, LocationSource, StartupConfig};
use citywx::data::{FixedLocator, IpLocator, Locator, WeatherClient, WeatherSource};
use citywx::refresh::{RefreshHandle, RefreshMessage};
use citywx::tasks::TaskRunner;
use citywx::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Sends logs to `path`; without a path nothing is logged, since stdout belongs to the UI
fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_env("CITYWX_LOG").unwrap_or_else(|_| EnvFilter::new("citywx=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    if app.dashboard.is_initial_load() {
        ui::render_loading(frame, app);
    } else {
        ui::render_dashboard(frame, app);
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

fn build_locator(source: LocationSource) -> Arc<dyn Locator> {
    match source {
        LocationSource::Fixed(coords) => Arc::new(FixedLocator::new(Some(coords))),
        LocationSource::IpLookup => Arc::new(IpLocator::new()),
        LocationSource::Disabled => Arc::new(FixedLocator::new(None)),
    }
}

/// Main event loop: spawn queued effects, draw, handle input and completions
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runner: &mut TaskRunner,
    refresh: &mut RefreshHandle,
) -> io::Result<()> {
    loop {
        for effect in app.take_effects() {
            runner.spawn(effect);
        }

        terminal.draw(|f| render_ui(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        while let Some(event) = runner.try_recv() {
            app.handle_event(event);
        }
        while let Some(RefreshMessage::Tick) = refresh.try_recv() {
            app.handle_refresh_tick();
        }
        app.tick();

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("citywx: {}", e);
            process::exit(2);
        }
    };

    init_logging(config.log_file.as_deref())?;
    info!(featured = %config.featured, "starting citywx");

    let source: Arc<dyn WeatherSource> =
        Arc::new(WeatherClient::new(config.api_key.clone()).with_base_url(config.api_url.clone()));
    let mut runner = TaskRunner::new(source, build_locator(config.location));
    let mut refresh = RefreshHandle::spawn(config.refresh.clone());

    let mut app = App::with_startup_config(&config);
    app.start();

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut runner, &mut refresh);

    // Stop the auto-refresh timer before leaving
    refresh.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    info!("citywx exiting");
    result.map_err(Into::into)
}
