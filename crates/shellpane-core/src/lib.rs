//! Core of the shellpane console.
//!
//! Everything in this crate is free of I/O: the [`Console`] state machine is
//! driven through [`Console::handle`] with [`InputEvent`]s and talks to the
//! child shell only through the [`ShellChannel`] trait. The runtime crate
//! supplies the real process channel and the terminal front-end.

pub mod boundary;
pub mod channel;
pub mod console;
pub mod decode;
pub mod editor;
pub mod history;
pub mod input;
pub mod scrollback;

pub use boundary::PromptBoundary;
pub use channel::{ChannelError, ChannelEvent, ProcessState, ShellChannel};
pub use console::{Console, ConsoleResponse};
pub use decode::Utf8StreamDecoder;
pub use editor::{EditOutcome, InputEditor};
pub use history::{CommandHistory, HistoryStep};
pub use input::{InputEvent, KeyCode, KeyInput, Modifiers};
pub use scrollback::ScrollbackBuffer;
