//! Events consumed by the console.
//!
//! These types are deliberately independent of any terminal or GUI library;
//! front-ends translate their native key events into [`KeyInput`].

/// Keys the console distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Esc,
    /// Anything the console has no use for
    Other,
}

/// Modifier key state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: true,
    };

    /// True if Ctrl or Alt is held. Shift alone does not count: it is part of
    /// typing an uppercase letter.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key pressed without modifiers
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }
}

/// Everything that can happen to a console, delivered through
/// [`crate::Console::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyPress(KeyInput),
    /// Pointer placed the cursor at a char offset of the display
    /// (scrollback followed by the pending line)
    PointerClick { position: usize },
    /// Raw bytes read from the shell's merged stdout/stderr
    ProcessOutput(Vec<u8>),
    /// The shell exited with the given code (`None` if killed by a signal)
    ProcessExited(Option<i32>),
}

impl From<KeyInput> for InputEvent {
    fn from(key: KeyInput) -> Self {
        InputEvent::KeyPress(key)
    }
}
