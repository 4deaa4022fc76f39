//! Tracing subscriber setup
//!
//! The terminal UI owns stdout, so all diagnostics go to a log file.
//! Filtering follows `RUST_LOG` with a DEBUG default.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber writing to `log_file_path`.
pub fn init_global(log_file_path: &Path) -> std::io::Result<()> {
    let log_file = File::create(log_file_path)?;
    build_subscriber(log_file).init();
    Ok(())
}

/// Subscriber shared between the binary and tests.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into());

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
