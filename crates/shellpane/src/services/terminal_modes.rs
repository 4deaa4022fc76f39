//! Terminal mode management
//!
//! The console needs raw mode, the alternate screen and mouse capture
//! (clicks place the cursor in the command line). Modes are recorded as they
//! are switched on and switched off again in reverse order, either through
//! `undo()` or on drop.

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{self, stdout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Raw,
    AlternateScreen,
    MouseCapture,
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Raw => "raw mode",
            Mode::AlternateScreen => "alternate screen",
            Mode::MouseCapture => "mouse capture",
        }
    }

    /// Mouse capture is optional: without it clicks are simply not delivered.
    fn is_required(self) -> bool {
        !matches!(self, Mode::MouseCapture)
    }

    fn switch_on(self) -> io::Result<()> {
        match self {
            Mode::Raw => enable_raw_mode(),
            Mode::AlternateScreen => stdout().execute(EnterAlternateScreen).map(|_| ()),
            Mode::MouseCapture => stdout().execute(EnableMouseCapture).map(|_| ()),
        }
    }

    fn switch_off(self) -> io::Result<()> {
        match self {
            Mode::Raw => disable_raw_mode(),
            Mode::AlternateScreen => stdout().execute(LeaveAlternateScreen).map(|_| ()),
            Mode::MouseCapture => stdout().execute(DisableMouseCapture).map(|_| ()),
        }
    }
}

const CONSOLE_MODES: [Mode; 3] = [Mode::Raw, Mode::AlternateScreen, Mode::MouseCapture];

/// Guard over the terminal modes the console switched on
#[derive(Debug, Default)]
pub struct TerminalModes {
    active: Vec<Mode>,
}

impl TerminalModes {
    /// Switch on every console mode. If a required one fails, whatever was
    /// already switched on is restored before the error is returned.
    pub fn enable() -> Result<Self> {
        let mut modes = Self::default();

        for mode in CONSOLE_MODES {
            match mode.switch_on() {
                Ok(()) => {
                    tracing::debug!("Enabled {}", mode.name());
                    modes.active.push(mode);
                }
                Err(e) if mode.is_required() => {
                    tracing::error!("Failed to enable {}: {}", mode.name(), e);
                    modes.undo();
                    return Err(e.into());
                }
                Err(e) => tracing::warn!("Failed to enable {}: {}", mode.name(), e),
            }
        }

        Ok(modes)
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn undo(&mut self) {
        while let Some(mode) = self.active.pop() {
            if let Err(e) = mode.switch_off() {
                tracing::warn!("Failed to disable {}: {}", mode.name(), e);
            } else {
                tracing::debug!("Disabled {}", mode.name());
            }
        }
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Switch everything off regardless of state. Used from the panic hook,
/// where no `TerminalModes` is reachable.
pub fn emergency_cleanup() {
    for mode in CONSOLE_MODES.iter().rev() {
        let _ = mode.switch_off();
    }
}
