//! UI rendering module for citywx
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard_view;
pub mod help_overlay;
pub mod loading;
pub mod search_box;
pub mod weather_card;

pub use dashboard_view::render_dashboard;
pub use help_overlay::render as render_help_overlay;
pub use loading::render as render_loading;
