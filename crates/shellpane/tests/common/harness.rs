//! Drives a real [`App`] against a `sh` child and a ratatui test backend.

#![allow(dead_code)]

use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use shellpane::app::{App, AppOptions};
use shellpane::config::Config;

/// How long to wait for the shell before failing a test
pub const SHELL_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ConsoleTestHarness {
    app: App,
    terminal: Terminal<TestBackend>,
}

impl ConsoleTestHarness {
    /// Console running plain `sh` with no session persistence
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_options(width, height, sh_config(), AppOptions::default())
    }

    pub fn with_options(width: u16, height: u16, config: Config, options: AppOptions) -> Self {
        let app = App::new(&config, options);
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        Self { app, terminal }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.app.handle_key(KeyEvent::new(code, modifiers))
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    /// Type `command` and press Enter
    pub fn run_command(&mut self, command: &str) {
        self.type_text(command);
        self.send_key(KeyCode::Enter, KeyModifiers::NONE);
    }

    pub fn click(&mut self, column: u16, row: u16) -> bool {
        self.app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    pub fn render(&mut self) {
        let app = &mut self.app;
        self.terminal.draw(|frame| app.render(frame)).unwrap();
    }

    /// Rendered screen, one line per row with trailing spaces trimmed
    pub fn screen_to_string(&mut self) -> String {
        self.render();
        let buffer = self.terminal.backend().buffer();
        let area = buffer.area;
        let mut lines = Vec::new();
        for y in 0..area.height {
            let mut line = String::new();
            for x in 0..area.width {
                if let Some(cell) = buffer.cell((x, y)) {
                    line.push_str(cell.symbol());
                }
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    pub fn scrollback(&self) -> String {
        self.app.console().scrollback().text().to_string()
    }

    /// Pump shell events until the scrollback contains `needle`.
    pub fn wait_for_output(&mut self, needle: &str) {
        let deadline = Instant::now() + SHELL_TIMEOUT;
        loop {
            self.app.process_shell_events();
            if self.scrollback().contains(needle) {
                return;
            }
            if Instant::now() > deadline {
                panic!(
                    "Timed out waiting for {:?}. Scrollback:\n{}",
                    needle,
                    self.scrollback()
                );
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

pub fn sh_config() -> Config {
    let mut config = Config::default();
    config.console.shell = Some("sh".to_string());
    config
}
