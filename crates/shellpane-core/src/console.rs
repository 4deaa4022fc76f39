//! The console state machine.
//!
//! A [`Console`] ties the scrollback, prompt boundary, command line and
//! history together and owns the write side of the shell. All mutation goes
//! through [`Console::handle`] (or the few programmatic entry points below)
//! on a single thread; process output reaches it as events rather than by
//! reading the pipe directly.
//!
//! Invariant: after every append the prompt boundary equals the scrollback
//! length, so everything already printed is frozen and only the pending
//! line after it can change.

use std::path::Path;

use crate::boundary::PromptBoundary;
use crate::channel::{ChannelError, ProcessState, ShellChannel};
use crate::decode::Utf8StreamDecoder;
use crate::editor::{EditOutcome, InputEditor};
use crate::history::CommandHistory;
use crate::input::{InputEvent, KeyInput};
use crate::scrollback::ScrollbackBuffer;

/// What handling an event did, so the front-end knows whether to redraw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleResponse {
    /// Nothing visible changed
    Unchanged,
    /// Scrollback, pending line or cursor changed
    Changed,
    /// A command was echoed and sent to the shell
    Submitted(String),
    /// The input targeted the frozen region and was dropped
    Rejected,
    /// Writing to the shell failed; the error has already been printed
    Failed(ChannelError),
}

pub struct Console<C: ShellChannel> {
    scrollback: ScrollbackBuffer,
    boundary: PromptBoundary,
    editor: InputEditor,
    history: CommandHistory,
    decoder: Utf8StreamDecoder,
    channel: C,
}

impl<C: ShellChannel> Console<C> {
    pub fn new(channel: C, history: CommandHistory) -> Self {
        Self {
            scrollback: ScrollbackBuffer::new(),
            boundary: PromptBoundary::new(),
            editor: InputEditor::new(),
            history,
            decoder: Utf8StreamDecoder::new(),
            channel,
        }
    }

    /// Single entry point for keys, clicks and process notifications.
    pub fn handle(&mut self, event: InputEvent) -> ConsoleResponse {
        match event {
            InputEvent::KeyPress(key) => self.handle_key(key),
            InputEvent::PointerClick { position } => {
                let before = self.cursor_position();
                self.editor.place_cursor(position, &self.boundary);
                if self.cursor_position() == before {
                    ConsoleResponse::Unchanged
                } else {
                    ConsoleResponse::Changed
                }
            }
            InputEvent::ProcessOutput(bytes) => {
                self.append_output(&bytes);
                ConsoleResponse::Changed
            }
            InputEvent::ProcessExited(code) => {
                self.on_process_exit(code);
                ConsoleResponse::Changed
            }
        }
    }

    fn handle_key(&mut self, key: KeyInput) -> ConsoleResponse {
        match self.editor.handle_key(key, &self.boundary, &mut self.history) {
            EditOutcome::Edited | EditOutcome::Moved => ConsoleResponse::Changed,
            EditOutcome::Rejected => ConsoleResponse::Rejected,
            EditOutcome::Ignored => ConsoleResponse::Unchanged,
            EditOutcome::Submit(line) => {
                let command = line.trim_end().to_string();
                if command.is_empty() {
                    // The line was cleared, nothing else to do
                    return if line.is_empty() {
                        ConsoleResponse::Unchanged
                    } else {
                        ConsoleResponse::Changed
                    };
                }
                match self.submit(&command) {
                    Ok(()) => ConsoleResponse::Submitted(command),
                    Err(e) => ConsoleResponse::Failed(e),
                }
            }
        }
    }

    /// Echo `command`, record it in history and send it to the shell.
    ///
    /// Blank commands are dropped without touching history or the shell.
    /// A failed write is reported in the scrollback and returned.
    pub fn submit(&mut self, command: &str) -> Result<(), ChannelError> {
        let command = command.trim_end();
        if command.is_empty() {
            return Ok(());
        }

        self.editor.clear();
        self.history.push(command);
        self.history.stop_browsing();
        self.append_text(&format!("{command}\n"));

        tracing::debug!("Submitting command: {:?}", command);
        self.write_to_shell(command)
    }

    /// Change the shell's working directory by sending `cd "<path>"`,
    /// bypassing the command line and history.
    pub fn update_path(&mut self, path: &Path) -> Result<(), ChannelError> {
        let command = format!("cd {}", quote_path(path));
        tracing::debug!("Updating shell path: {}", path.display());
        self.write_to_shell(&command)
    }

    fn write_to_shell(&mut self, line: &str) -> Result<(), ChannelError> {
        self.channel.write_line(line).map_err(|e| {
            tracing::warn!("Write to shell failed: {}", e);
            self.system_message("ERROR", &e.to_string());
            e
        })
    }

    /// Decode a chunk of shell output and append it to the scrollback.
    pub fn append_output(&mut self, bytes: &[u8]) {
        let decoded = self.decoder.decode(bytes);
        if decoded.replaced > 0 {
            tracing::debug!(
                "Replaced {} invalid UTF-8 sequence(s) in shell output",
                decoded.replaced
            );
        }
        if !decoded.text.is_empty() {
            self.append_text(&decoded.text);
        }
    }

    fn on_process_exit(&mut self, code: Option<i32>) {
        let tail = self.decoder.finish();
        if !tail.text.is_empty() {
            self.append_text(&tail.text);
        }

        let message = match (self.channel.state(), code) {
            (ProcessState::Terminated, _) => "Shell terminated.".to_string(),
            (_, Some(code)) => format!("Shell exited with code {code}."),
            (_, None) => "Shell exited.".to_string(),
        };
        tracing::info!("{}", message);
        self.system_message("INFO", &message);
    }

    /// Print the startup banner.
    pub fn announce_start(&mut self) {
        self.system_message("INFO", "Shell started.");
    }

    /// Make a spawn failure visible in the scrollback.
    pub fn report_spawn_failure(&mut self, error: &ChannelError) {
        tracing::error!("{}", error);
        self.system_message("ERROR", &error.to_string());
    }

    /// Append a `[LEVEL] message` line, starting on a fresh line.
    pub fn system_message(&mut self, level: &str, message: &str) {
        let mut line = String::new();
        if !self.scrollback.ends_at_line_start() {
            line.push('\n');
        }
        line.push_str(&format!("[{level}] {message}\n"));
        self.append_text(&line);
    }

    /// Every append goes through here so the boundary follows the buffer.
    fn append_text(&mut self, text: &str) {
        let len = self.scrollback.append(text);
        self.boundary.advance_to(len);
    }

    /// Ask the shell to exit. Idempotent.
    pub fn terminate(&mut self) {
        self.channel.terminate();
    }

    /// Explicit session reset: drop the scrollback and rewind the boundary.
    /// The pending line and history survive.
    pub fn clear(&mut self) {
        self.scrollback.clear();
        self.boundary.reset();
    }

    pub fn scrollback(&self) -> &ScrollbackBuffer {
        &self.scrollback
    }

    pub fn boundary(&self) -> &PromptBoundary {
        &self.boundary
    }

    pub fn pending(&self) -> &str {
        self.editor.pending()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Cursor in display coordinates
    pub fn cursor_position(&self) -> usize {
        self.editor.cursor_position(&self.boundary)
    }

    /// Scrollback followed by the pending command line
    pub fn display_text(&self) -> String {
        let mut text = String::with_capacity(self.scrollback.text().len() + self.pending().len());
        text.push_str(self.scrollback.text());
        text.push_str(self.pending());
        text
    }

    pub fn process_state(&self) -> ProcessState {
        self.channel.state()
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}

/// Double-quote `path` for a POSIX shell. Inside double quotes only these
/// four characters keep a special meaning.
fn quote_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
