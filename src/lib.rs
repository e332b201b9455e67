//! citywx library
//!
//! Exposes the dashboard modules for use by the binary and integration tests.

pub mod app;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod matching;
pub mod refresh;
pub mod suggest;
pub mod tasks;
pub mod theme;
pub mod ui;
pub mod units;
