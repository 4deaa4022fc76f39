//! Translation from crossterm key events to console keys.
//!
//! The console core knows nothing about crossterm; this is the only place
//! where the two key vocabularies meet.

use crossterm::event::{KeyCode as CtKeyCode, KeyEvent, KeyModifiers};
use shellpane_core::{KeyCode, KeyInput, Modifiers};

/// Convert a crossterm key event into a console key.
pub fn translate(event: &KeyEvent) -> KeyInput {
    KeyInput::new(translate_code(&event.code), translate_modifiers(event.modifiers))
}

fn translate_code(code: &CtKeyCode) -> KeyCode {
    match code {
        CtKeyCode::Char(c) => KeyCode::Char(*c),
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::Esc => KeyCode::Esc,
        _ => KeyCode::Other,
    }
}

fn translate_modifiers(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        shift: modifiers.contains(KeyModifiers::SHIFT),
    }
}
