//! Child shell process behind the console.
//!
//! stdout and stderr share one pipe, so the shell's output reaches the
//! console as a single byte stream in the order it was written. One reader
//! thread forwards raw chunks into the event channel; the event loop drains
//! that channel without blocking and hands the chunks to the console as
//! `InputEvent::ProcessOutput`.
//!
//! A separate waiter thread watches the child itself. As soon as the shell
//! exits its state becomes `Exited`, even if a background job still holds the
//! output pipe open. The waiter then gives the reader a short grace period
//! to drain what the shell wrote last before sending `ChannelEvent::Exited`.

use std::io::{self, PipeReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use shellpane_core::{ChannelError, ChannelEvent, ProcessState, ShellChannel};

/// Size of a single read from the shell's output pipe
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// How often the waiter checks whether the shell has exited
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long the waiter lets the reader catch up after the shell exits
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_millis(250);

/// Program, arguments and working directory used to launch the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    /// `powershell -NoExit` on Windows, `bash --login` everywhere else.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::new("powershell", vec!["-NoExit".to_string()])
        } else {
            Self::new("bash", vec!["--login".to_string()])
        }
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }
}

/// A shell child process with piped stdin and merged output.
pub struct ShellProcess {
    command: ShellCommand,
    pid: Option<u32>,
    child: Option<Arc<Mutex<Child>>>,
    stdin: Option<ChildStdin>,
    state: Arc<Mutex<ProcessState>>,
}

impl ShellProcess {
    /// Create the handle without launching anything yet.
    pub fn new(command: ShellCommand) -> Self {
        Self {
            command,
            pid: None,
            child: None,
            stdin: None,
            state: Arc::new(Mutex::new(ProcessState::Starting)),
        }
    }

    pub fn command(&self) -> &ShellCommand {
        &self.command
    }

    /// Launch the shell. Output and the exit notification are sent to `events`.
    pub fn start(&mut self, events: mpsc::Sender<ChannelEvent>) -> Result<(), ChannelError> {
        if self.child.is_some() {
            return Ok(());
        }

        let (mut child, output) = self.spawn().map_err(|e| {
            self.set_state(ProcessState::Exited(None));
            ChannelError::ProcessSpawn {
                program: self.command.program.clone(),
                message: e.to_string(),
            }
        })?;

        let pid = child.id();
        tracing::info!(
            "Started shell {:?} {:?} (pid {})",
            self.command.program,
            self.command.args,
            pid
        );

        self.stdin = child.stdin.take();
        let child = Arc::new(Mutex::new(child));
        self.pid = Some(pid);
        self.child = Some(child.clone());
        self.set_state(ProcessState::Running);

        let (drained_tx, drained_rx) = mpsc::channel();
        spawn_reader(output, events.clone(), drained_tx);
        spawn_waiter(ExitWatch {
            child,
            state: self.state.clone(),
            events,
            drained: drained_rx,
        });

        Ok(())
    }

    /// Spawn the child with stdout and stderr both writing into one pipe.
    fn spawn(&self) -> io::Result<(Child, PipeReader)> {
        let (reader, writer) = io::pipe()?;

        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        if let Some(dir) = &self.command.working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn()?;
        // The command keeps the parent's copies of the write end; the reader
        // only sees EOF once they are closed.
        drop(cmd);
        Ok((child, reader))
    }

    fn set_state(&self, new_state: ProcessState) {
        if let Ok(mut state) = self.state.lock() {
            *state = new_state;
        }
    }
}

impl ShellChannel for ShellProcess {
    fn write_line(&mut self, line: &str) -> Result<(), ChannelError> {
        if !self.state().is_running() {
            return Err(ChannelError::ProcessNotRunning);
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ChannelError::ProcessNotRunning);
        };

        let result = stdin
            .write_all(format!("{line}\n").as_bytes())
            .and_then(|_| stdin.flush());
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                // The shell is gone; the watcher will report the exit code
                self.stdin = None;
                Err(ChannelError::ProcessNotRunning)
            }
            Err(e) => Err(ChannelError::Io(e.to_string())),
        }
    }

    fn state(&self) -> ProcessState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(ProcessState::Exited(None))
    }

    fn terminate(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            match *state {
                ProcessState::Starting | ProcessState::Running => {
                    *state = ProcessState::Terminated;
                }
                ProcessState::Exited(_) | ProcessState::Terminated => return,
            }
        }

        // Closing stdin alone is enough for most shells to exit
        self.stdin = None;
        request_shutdown(self.pid, self.child.as_ref());
        tracing::info!("Requested shell shutdown");
    }
}

impl Drop for ShellProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[cfg(unix)]
fn request_shutdown(pid: Option<u32>, _child: Option<&Arc<Mutex<Child>>>) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return;
    };
    if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        tracing::debug!("SIGTERM to shell (pid {}) failed: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn request_shutdown(_pid: Option<u32>, child: Option<&Arc<Mutex<Child>>>) {
    if let Some(child) = child {
        if let Ok(mut child) = child.lock() {
            let _ = child.kill();
        }
    }
}

/// Everything the waiter thread needs to report the shell's exit
struct ExitWatch {
    child: Arc<Mutex<Child>>,
    state: Arc<Mutex<ProcessState>>,
    events: mpsc::Sender<ChannelEvent>,
    /// Signalled by the reader once the output pipe reaches EOF
    drained: mpsc::Receiver<()>,
}

impl ExitWatch {
    /// Poll rather than block in `wait` so the child lock stays free for
    /// platforms that kill through the handle.
    fn wait_for_exit(&self) -> Option<i32> {
        loop {
            let status = match self.child.lock() {
                Ok(mut child) => child.try_wait(),
                Err(_) => return None,
            };
            match status {
                Ok(Some(status)) => return status.code(),
                Ok(None) => thread::sleep(EXIT_POLL_INTERVAL),
                Err(e) => {
                    tracing::warn!("Failed to collect shell exit status: {}", e);
                    return None;
                }
            }
        }
    }

    fn run(self) {
        let code = self.wait_for_exit();
        if let Ok(mut state) = self.state.lock() {
            if *state != ProcessState::Terminated {
                *state = ProcessState::Exited(code);
            }
        }
        tracing::info!("Shell exited with code {:?}", code);

        if self.drained.recv_timeout(OUTPUT_DRAIN_TIMEOUT).is_err() {
            // A background job inherited the pipe; its output keeps flowing
            tracing::debug!("Shell output still open after exit");
        }
        let _ = self.events.send(ChannelEvent::Exited(code));
    }
}

fn spawn_waiter(watch: ExitWatch) {
    thread::spawn(move || watch.run());
}

fn spawn_reader(
    mut source: PipeReader,
    events: mpsc::Sender<ChannelEvent>,
    drained: mpsc::Sender<()>,
) {
    thread::spawn(move || {
        let mut buffer = vec![0u8; READ_CHUNK_SIZE];
        loop {
            match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    if events.send(ChannelEvent::Output(buffer[..n].to_vec())).is_err() {
                        // Nobody is listening any more
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!("Reading shell output failed: {}", e);
                    break;
                }
            }
        }
        tracing::debug!("Shell output closed");
        let _ = drained.send(());
    });
}
