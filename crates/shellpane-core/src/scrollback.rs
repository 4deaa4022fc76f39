//! Append-only text store backing the console display.
//!
//! Offsets are measured in chars, not bytes, so that a position handed out
//! by the front-end (a click on a rendered cell) lines up with the editing
//! rules regardless of how many bytes each glyph takes.

/// Everything ever printed to the console: process output, echoed commands
/// and system messages.
///
/// Once appended, a char keeps its index forever. The only way to remove
/// content is [`ScrollbackBuffer::clear`].
#[derive(Debug, Clone, Default)]
pub struct ScrollbackBuffer {
    text: String,
    /// Cached char count of `text`
    len: usize,
}

impl ScrollbackBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` to the end and return the new total length in chars.
    pub fn append(&mut self, text: &str) -> usize {
        self.text.push_str(text);
        self.len += text.chars().count();
        self.len
    }

    /// Current length in chars
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop all content. Only used for an explicit session reset.
    pub fn clear(&mut self) {
        self.text.clear();
        self.len = 0;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text from char offset `from` to the end. Offsets past the end yield "".
    pub fn slice_from(&self, from: usize) -> &str {
        match self.text.char_indices().nth(from) {
            Some((byte, _)) => &self.text[byte..],
            None => "",
        }
    }

    /// Whether the last appended char is a newline (or the buffer is empty).
    ///
    /// System messages use this to start on a fresh line.
    pub fn ends_at_line_start(&self) -> bool {
        self.text.is_empty() || self.text.ends_with('\n')
    }
}
