//! The seam between the console and the child shell process.

use std::fmt;

/// Lifecycle of the child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Starting,
    Running,
    /// Exited on its own; carries the exit code when there is one
    Exited(Option<i32>),
    /// Shut down at our request
    Terminated,
}

impl ProcessState {
    pub fn is_running(&self) -> bool {
        matches!(self, ProcessState::Running)
    }
}

/// Messages delivered from the process reader threads to the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Output(Vec<u8>),
    Exited(Option<i32>),
}

/// Errors raised at the process channel boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The shell executable could not be found or launched
    ProcessSpawn { program: String, message: String },
    /// A write was attempted after the shell exited or was terminated
    ProcessNotRunning,
    /// Any other I/O failure while talking to the shell
    Io(String),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::ProcessSpawn { program, message } => {
                write!(f, "failed to start shell '{program}': {message}")
            }
            ChannelError::ProcessNotRunning => write!(f, "shell process is not running"),
            ChannelError::Io(msg) => write!(f, "shell I/O error: {msg}"),
        }
    }
}

impl std::error::Error for ChannelError {}

/// Write side of a running shell.
///
/// Output does not flow through this trait: it arrives as
/// [`crate::InputEvent::ProcessOutput`] events so that the console is only
/// ever mutated from the thread that owns it.
pub trait ShellChannel {
    /// Send `line` followed by a newline to the shell's stdin.
    fn write_line(&mut self, line: &str) -> Result<(), ChannelError>;

    fn state(&self) -> ProcessState;

    /// Ask the shell to shut down. Calling this more than once is harmless.
    fn terminate(&mut self);
}
