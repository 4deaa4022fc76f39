//! The live command line.
//!
//! The pending command always sits directly after the prompt boundary, so
//! the editor keeps its cursor relative to the start of the line and checks
//! every mutation against the boundary in absolute display coordinates.

use crate::boundary::PromptBoundary;
use crate::history::{CommandHistory, HistoryStep};
use crate::input::{KeyCode, KeyInput};

/// What a key press did to the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Pending text changed
    Edited,
    /// Only the cursor moved
    Moved,
    /// Enter was pressed; carries the line as typed
    Submit(String),
    /// The key targeted the frozen region (or nothing) and was dropped
    Rejected,
    /// The key means nothing to the command line
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct InputEditor {
    pending: String,
    /// Cursor as a char offset into `pending`
    cursor: usize,
}

impl InputEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Length of the pending text in chars
    pub fn pending_len(&self) -> usize {
        self.pending.chars().count()
    }

    /// Cursor offset inside the pending text
    pub fn cursor_offset(&self) -> usize {
        self.cursor
    }

    /// Cursor in display coordinates
    pub fn cursor_position(&self, boundary: &PromptBoundary) -> usize {
        boundary.offset() + self.cursor
    }

    /// Replace the pending text and put the cursor at its end.
    pub fn set_pending(&mut self, text: &str) {
        self.pending = text.to_string();
        self.cursor = self.pending_len();
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.cursor = 0;
    }

    /// Take the pending text, leaving the line empty.
    pub fn take_pending(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.pending)
    }

    /// Place the cursor from a pointer click. Positions in the frozen region
    /// are clamped forward to the boundary, positions past the end to the end.
    pub fn place_cursor(&mut self, position: usize, boundary: &PromptBoundary) {
        let position = boundary.clamp(position);
        self.cursor = (position - boundary.offset()).min(self.pending_len());
    }

    pub fn handle_key(
        &mut self,
        key: KeyInput,
        boundary: &PromptBoundary,
        history: &mut CommandHistory,
    ) -> EditOutcome {
        let position = self.cursor_position(boundary);
        let mods = key.modifiers;

        match key.code {
            KeyCode::Enter if mods.is_empty() => {
                history.stop_browsing();
                EditOutcome::Submit(self.take_pending())
            }
            KeyCode::Enter => EditOutcome::Ignored,

            KeyCode::Char('u') if mods.ctrl => {
                if self.cursor == 0 {
                    return EditOutcome::Rejected;
                }
                self.remove_range(0, self.cursor);
                self.cursor = 0;
                history.stop_browsing();
                EditOutcome::Edited
            }
            KeyCode::Char('k') if mods.ctrl => {
                if self.cursor >= self.pending_len() {
                    return EditOutcome::Rejected;
                }
                self.remove_range(self.cursor, self.pending_len());
                history.stop_browsing();
                EditOutcome::Edited
            }
            KeyCode::Char(_) if mods.has_command_modifier() => EditOutcome::Ignored,
            KeyCode::Char(c) => {
                if !boundary.is_editable(position) {
                    return EditOutcome::Rejected;
                }
                let at = byte_index(&self.pending, self.cursor);
                self.pending.insert(at, c);
                self.cursor += 1;
                history.stop_browsing();
                EditOutcome::Edited
            }

            KeyCode::Backspace => {
                let Some(target) = position.checked_sub(1) else {
                    return EditOutcome::Rejected;
                };
                if !boundary.is_editable(target) {
                    return EditOutcome::Rejected;
                }
                self.remove_range(self.cursor - 1, self.cursor);
                self.cursor -= 1;
                history.stop_browsing();
                EditOutcome::Edited
            }
            KeyCode::Delete => {
                if !boundary.is_editable(position) || self.cursor >= self.pending_len() {
                    return EditOutcome::Rejected;
                }
                self.remove_range(self.cursor, self.cursor + 1);
                history.stop_browsing();
                EditOutcome::Edited
            }

            KeyCode::Left => match position.checked_sub(1) {
                Some(target) if boundary.is_editable(target) => {
                    self.cursor -= 1;
                    EditOutcome::Moved
                }
                _ => EditOutcome::Rejected,
            },
            KeyCode::Right => {
                if self.cursor >= self.pending_len() {
                    return EditOutcome::Rejected;
                }
                self.cursor += 1;
                EditOutcome::Moved
            }
            KeyCode::Home => {
                self.cursor = 0;
                EditOutcome::Moved
            }
            KeyCode::End => {
                self.cursor = self.pending_len();
                EditOutcome::Moved
            }
            // Would land inside the frozen region
            KeyCode::PageUp => EditOutcome::Rejected,

            KeyCode::Up => self.apply_history(history.older()),
            KeyCode::Down => self.apply_history(history.newer()),

            KeyCode::PageDown | KeyCode::Tab | KeyCode::Esc | KeyCode::Other => {
                EditOutcome::Ignored
            }
        }
    }

    fn apply_history(&mut self, step: HistoryStep) -> EditOutcome {
        match step {
            HistoryStep::Recall(entry) => {
                self.set_pending(&entry);
                EditOutcome::Edited
            }
            HistoryStep::Exhausted => {
                self.clear();
                EditOutcome::Edited
            }
            HistoryStep::Unchanged => EditOutcome::Ignored,
        }
    }

    /// Remove chars `[start, end)` of the pending text.
    fn remove_range(&mut self, start: usize, end: usize) {
        let start = byte_index(&self.pending, start);
        let end = byte_index(&self.pending, end);
        self.pending.replace_range(start..end, "");
    }
}

/// Byte index of the char at `char_offset`, or the string length past the end
fn byte_index(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    fn key(code: KeyCode) -> KeyInput {
        KeyInput::plain(code)
    }

    fn boundary_at(offset: usize) -> PromptBoundary {
        let mut boundary = PromptBoundary::new();
        boundary.advance_to(offset);
        boundary
    }

    fn type_str(editor: &mut InputEditor, text: &str, boundary: &PromptBoundary) {
        let mut history = CommandHistory::new();
        for c in text.chars() {
            editor.handle_key(key(KeyCode::Char(c)), boundary, &mut history);
        }
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let boundary = boundary_at(10);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();

        type_str(&mut editor, "lx", &boundary);
        editor.handle_key(key(KeyCode::Left), &boundary, &mut history);
        editor.handle_key(key(KeyCode::Char('s')), &boundary, &mut history);
        editor.handle_key(key(KeyCode::Delete), &boundary, &mut history);

        assert_eq!(editor.pending(), "ls");
        assert_eq!(editor.cursor_position(&boundary), 12);
    }

    #[test]
    fn test_backspace_at_boundary_is_rejected() {
        let boundary = boundary_at(5);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();

        assert_eq!(
            editor.handle_key(key(KeyCode::Backspace), &boundary, &mut history),
            EditOutcome::Rejected
        );

        type_str(&mut editor, "ab", &boundary);
        editor.handle_key(key(KeyCode::Home), &boundary, &mut history);
        assert_eq!(
            editor.handle_key(key(KeyCode::Backspace), &boundary, &mut history),
            EditOutcome::Rejected
        );
        assert_eq!(editor.pending(), "ab");
    }

    #[test]
    fn test_left_stops_at_boundary() {
        let boundary = boundary_at(3);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();
        type_str(&mut editor, "a", &boundary);

        assert_eq!(
            editor.handle_key(key(KeyCode::Left), &boundary, &mut history),
            EditOutcome::Moved
        );
        assert_eq!(
            editor.handle_key(key(KeyCode::Left), &boundary, &mut history),
            EditOutcome::Rejected
        );
        assert_eq!(editor.cursor_position(&boundary), 3);
    }

    #[test]
    fn test_page_up_is_rejected() {
        let boundary = boundary_at(3);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();
        assert_eq!(
            editor.handle_key(key(KeyCode::PageUp), &boundary, &mut history),
            EditOutcome::Rejected
        );
    }

    #[test]
    fn test_multibyte_editing() {
        let boundary = boundary_at(0);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();
        type_str(&mut editor, "échø", &boundary);
        editor.handle_key(key(KeyCode::Backspace), &boundary, &mut history);
        editor.handle_key(key(KeyCode::Home), &boundary, &mut history);
        editor.handle_key(key(KeyCode::Delete), &boundary, &mut history);
        assert_eq!(editor.pending(), "ch");
    }

    #[test]
    fn test_enter_submits_and_clears() {
        let boundary = boundary_at(0);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();
        type_str(&mut editor, "pwd", &boundary);

        assert_eq!(
            editor.handle_key(key(KeyCode::Enter), &boundary, &mut history),
            EditOutcome::Submit("pwd".to_string())
        );
        assert_eq!(editor.pending(), "");
        assert_eq!(editor.cursor_offset(), 0);
    }

    #[test]
    fn test_enter_with_modifier_is_ignored() {
        let boundary = boundary_at(0);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();
        type_str(&mut editor, "pwd", &boundary);

        let shift_enter = KeyInput::new(KeyCode::Enter, Modifiers::SHIFT);
        assert_eq!(
            editor.handle_key(shift_enter, &boundary, &mut history),
            EditOutcome::Ignored
        );
        assert_eq!(editor.pending(), "pwd");
    }

    #[test]
    fn test_ctrl_u_and_ctrl_k() {
        let boundary = boundary_at(0);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();
        type_str(&mut editor, "git status", &boundary);
        for _ in 0..6 {
            editor.handle_key(key(KeyCode::Left), &boundary, &mut history);
        }

        editor.handle_key(KeyInput::ctrl('k'), &boundary, &mut history);
        assert_eq!(editor.pending(), "git ");
        editor.handle_key(KeyInput::ctrl('u'), &boundary, &mut history);
        assert_eq!(editor.pending(), "");
    }

    #[test]
    fn test_ctrl_chars_are_not_inserted() {
        let boundary = boundary_at(0);
        let mut history = CommandHistory::new();
        let mut editor = InputEditor::new();
        assert_eq!(
            editor.handle_key(KeyInput::ctrl('c'), &boundary, &mut history),
            EditOutcome::Ignored
        );
        assert_eq!(editor.pending(), "");
    }

    #[test]
    fn test_place_cursor_clamps() {
        let boundary = boundary_at(20);
        let mut editor = InputEditor::new();
        editor.set_pending("make");

        editor.place_cursor(15, &boundary);
        assert_eq!(editor.cursor_position(&boundary), 20);

        editor.place_cursor(22, &boundary);
        assert_eq!(editor.cursor_position(&boundary), 22);

        editor.place_cursor(99, &boundary);
        assert_eq!(editor.cursor_position(&boundary), 24);
    }

    #[test]
    fn test_editing_detaches_from_history() {
        let boundary = boundary_at(0);
        let mut history = CommandHistory::new();
        history.push("ls");
        history.push("pwd");
        let mut editor = InputEditor::new();

        editor.handle_key(key(KeyCode::Up), &boundary, &mut history);
        assert_eq!(editor.pending(), "pwd");
        assert!(history.is_browsing());

        editor.handle_key(key(KeyCode::Char('x')), &boundary, &mut history);
        assert_eq!(editor.pending(), "pwdx");
        assert!(!history.is_browsing());

        // Next Up starts again from the newest entry
        editor.handle_key(key(KeyCode::Up), &boundary, &mut history);
        assert_eq!(editor.pending(), "pwd");
    }
}
