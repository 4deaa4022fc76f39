//! The running console application.
//!
//! [`App`] owns the console, the receiving end of the shell's event channel
//! and the view state. The event loop in `main.rs` feeds it terminal events
//! and calls [`App::process_shell_events`] between polls; everything runs on
//! that one thread.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use shellpane_core::{ChannelEvent, CommandHistory, Console, ConsoleResponse, InputEvent};

use crate::config::Config;
use crate::input::key_translator;
use crate::services::shell_process::ShellProcess;
use crate::session::{SessionFile, SessionStore};
use crate::view::console_view::{self, RenderedView};
use crate::view::theme::Theme;

/// Rows moved per mouse wheel notch
const WHEEL_SCROLL_ROWS: usize = 3;

/// Startup choices that come from the command line rather than the config
#[derive(Debug, Default)]
pub struct AppOptions {
    /// Directory the shell should `cd` into once it is running
    pub project_dir: Option<PathBuf>,
    /// Where to restore and save history; `None` disables persistence
    pub session: Option<SessionStore>,
}

pub struct App {
    console: Console<ShellProcess>,
    events: Receiver<ChannelEvent>,
    theme: Theme,
    /// Rows scrolled back from the bottom; 0 follows the cursor
    scroll: usize,
    last_view: RenderedView,
    session: Option<SessionStore>,
    should_quit: bool,
}

impl App {
    /// Restore history, start the shell and print the startup banner.
    ///
    /// A shell that fails to start is reported in the scrollback rather
    /// than returned, so the user still gets a console showing the error.
    pub fn new(config: &Config, options: AppOptions) -> Self {
        let limit = config.console.history_limit;
        let history = options
            .session
            .as_ref()
            .map(|store| restore_history(store, limit))
            .unwrap_or_else(|| CommandHistory::with_limit(limit));

        let mut console = Console::new(ShellProcess::new(config.shell_command()), history);

        let (tx, events) = mpsc::channel();
        match console.channel_mut().start(tx) {
            Ok(()) => console.announce_start(),
            Err(e) => console.report_spawn_failure(&e),
        }

        if let Some(dir) = &options.project_dir {
            if let Err(e) = console.update_path(dir) {
                tracing::warn!("Could not change shell directory to {}: {}", dir.display(), e);
            }
        }

        Self {
            console,
            events,
            theme: config.theme,
            scroll: 0,
            last_view: RenderedView::default(),
            session: options.session,
            should_quit: false,
        }
    }

    pub fn console(&self) -> &Console<ShellProcess> {
        &self.console
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Drain everything the shell has sent so far without blocking.
    /// Returns true if anything arrived.
    pub fn process_shell_events(&mut self) -> bool {
        let mut changed = false;
        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            let input = match event {
                ChannelEvent::Output(bytes) => InputEvent::ProcessOutput(bytes),
                ChannelEvent::Exited(code) => InputEvent::ProcessExited(code),
            };
            changed |= self.console.handle(input) != ConsoleResponse::Unchanged;
        }
        changed
    }

    /// Handle a key press. Returns true if a redraw is needed.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        tracing::trace!("Key: code={:?}, modifiers={:?}", event.code, event.modifiers);

        if event.modifiers.contains(KeyModifiers::CONTROL) {
            match event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return false;
                }
                KeyCode::Char('t') => {
                    self.theme = self.theme.toggle();
                    tracing::debug!("Switched to {} theme", self.theme.name());
                    return true;
                }
                KeyCode::Char('l') => {
                    self.console.clear();
                    self.scroll = 0;
                    return true;
                }
                _ => {}
            }
        }

        match event.code {
            KeyCode::PageUp => {
                self.scroll_by(self.page_rows() as isize);
                return true;
            }
            KeyCode::PageDown => {
                self.scroll_by(-(self.page_rows() as isize));
                return true;
            }
            _ => {}
        }

        let key = key_translator::translate(&event);
        let response = self.console.handle(InputEvent::KeyPress(key));
        self.after_console_response(response)
    }

    /// Handle a mouse event. Returns true if a redraw is needed.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(position) = self.last_view.position_at(event.column, event.row) else {
                    return false;
                };
                let response = self.console.handle(InputEvent::PointerClick { position });
                response != ConsoleResponse::Unchanged
            }
            MouseEventKind::ScrollUp => {
                self.scroll_by(WHEEL_SCROLL_ROWS as isize);
                true
            }
            MouseEventKind::ScrollDown => {
                self.scroll_by(-(WHEEL_SCROLL_ROWS as isize));
                true
            }
            _ => false,
        }
    }

    fn after_console_response(&mut self, response: ConsoleResponse) -> bool {
        match response {
            ConsoleResponse::Unchanged => false,
            ConsoleResponse::Rejected => {
                tracing::trace!("Input rejected: outside the editable region");
                false
            }
            ConsoleResponse::Failed(e) => {
                tracing::debug!("Command not delivered: {}", e);
                self.scroll = 0;
                true
            }
            ConsoleResponse::Changed | ConsoleResponse::Submitted(_) => {
                self.scroll = 0;
                true
            }
        }
    }

    fn page_rows(&self) -> usize {
        usize::from(self.last_view.body.height.saturating_sub(1)).max(1)
    }

    fn scroll_by(&mut self, rows: isize) {
        let target = self.scroll.saturating_add_signed(rows);
        self.scroll = target.min(self.last_view.max_scroll());
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.last_view = console_view::render(frame, area, &self.console, self.theme, self.scroll);
        self.scroll = self.last_view.scroll;
    }

    /// Write the command history into the session file, keeping any other
    /// entries already stored there.
    pub fn save_session(&self) {
        let Some(store) = &self.session else {
            return;
        };

        let mut session = store.load().unwrap_or_else(|e| {
            tracing::warn!("Replacing unreadable session file: {}", e);
            SessionFile::default()
        });
        session.set_history(self.console.history());

        if let Err(e) = store.save(&session) {
            tracing::warn!("Failed to save session: {}", e);
        } else {
            tracing::debug!("Session saved successfully");
        }
    }

    /// Save the session and stop the shell.
    pub fn shutdown(&mut self) {
        self.save_session();
        self.console.terminate();
        tracing::info!("Console shut down");
    }
}

fn restore_history(store: &SessionStore, limit: Option<usize>) -> CommandHistory {
    match store.load() {
        Ok(session) => {
            let history = session.restore_history(limit);
            tracing::debug!("Restored {} history entries", history.len());
            history
        }
        Err(e) => {
            tracing::warn!("Ignoring session file {}: {}", store.path().display(), e);
            CommandHistory::with_limit(limit)
        }
    }
}
