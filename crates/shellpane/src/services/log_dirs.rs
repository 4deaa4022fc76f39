//! Log directory management
//!
//! Logs live under the platform state directory (`~/.local/state/shellpane/logs`
//! on Linux), falling back to the local data directory and finally the
//! system temp directory. Each process writes its own PID-named file so
//! concurrent instances never share a log.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the log directory, creating it on first use.
pub fn log_dir() -> &'static PathBuf {
    LOG_DIR.get_or_init(|| {
        let dir = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|base| base.join("shellpane").join("logs"))
            .unwrap_or_else(fallback_log_dir);

        if let Err(e) = fs::create_dir_all(&dir) {
            // tracing is not set up yet at this point
            eprintln!("Failed to create log directory {:?}: {}", dir, e);
            let fallback = fallback_log_dir();
            let _ = fs::create_dir_all(&fallback);
            return fallback;
        }

        dir
    })
}

fn fallback_log_dir() -> PathBuf {
    std::env::temp_dir().join("shellpane-logs")
}

/// `{log_dir}/shellpane-{PID}.log`
pub fn main_log_path() -> PathBuf {
    log_dir().join(format!("shellpane-{}.log", std::process::id()))
}
