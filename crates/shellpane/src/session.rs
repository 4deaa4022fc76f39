//! Persisted console session.
//!
//! The session file is a JSON list of named text entries. The console only
//! uses one of them, `"history"`, holding the command history as
//! newline-separated commands (oldest first). Unknown entries are kept
//! as-is when the file is rewritten.

use serde::{Deserialize, Serialize};
use shellpane_core::CommandHistory;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Current session file format
pub const SESSION_VERSION: u32 = 1;

/// Name of the entry holding the command history
pub const HISTORY_ENTRY: &str = "history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<SessionEntry>,
}

fn default_version() -> u32 {
    SESSION_VERSION
}

impl Default for SessionFile {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            entries: Vec::new(),
        }
    }
}

impl SessionFile {
    pub fn entry(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.text.as_str())
    }

    /// Insert or replace the entry called `name`.
    pub fn set_entry(&mut self, name: &str, text: String) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.text = text,
            None => self.entries.push(SessionEntry {
                name: name.to_string(),
                text,
            }),
        }
    }

    /// Store `history` under [`HISTORY_ENTRY`].
    pub fn set_history(&mut self, history: &CommandHistory) {
        let text = history.iter().collect::<Vec<_>>().join("\n");
        self.set_entry(HISTORY_ENTRY, text);
    }

    /// Rebuild a history from [`HISTORY_ENTRY`], honoring `limit`.
    /// A missing entry yields an empty history.
    pub fn restore_history(&self, limit: Option<usize>) -> CommandHistory {
        let mut history = CommandHistory::with_limit(limit);
        if let Some(text) = self.entry(HISTORY_ENTRY) {
            for line in text.lines() {
                history.push(line);
            }
        }
        history
    }
}

/// Reads and writes the session file at a fixed path
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session. A missing file is an empty session.
    pub fn load(&self) -> Result<SessionFile, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No session file at {}", self.path.display());
                return Ok(SessionFile::default());
            }
            Err(e) => return Err(SessionError::Io(e)),
        };

        serde_json::from_str(&contents).map_err(|e| SessionError::Parse(e.to_string()))
    }

    /// Write the session: temp file first, then rename over the target.
    pub fn save(&self, session: &SessionFile) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            serde_json::to_vec_pretty(session).map_err(|e| SessionError::Parse(e.to_string()))?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(&contents)?;
        drop(file);
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(
            "Saved session ({} entries) to {}",
            session.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Parse(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "session I/O error: {e}"),
            SessionError::Parse(msg) => write!(f, "invalid session file: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Io(e) => Some(e),
            SessionError::Parse(_) => None,
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(e)
    }
}
