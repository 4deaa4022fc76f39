//! shellpane: an interactive shell console hosted in the terminal.
//!
//! The console state machine lives in `shellpane-core`; this crate provides
//! the OS process channel, configuration, session persistence, logging and
//! the crossterm/ratatui front-end.

pub mod app;
pub mod config;
pub mod input;
pub mod services;
pub mod session;
pub mod view;
