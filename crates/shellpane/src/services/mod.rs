pub mod log_dirs;
pub mod shell_process;
pub mod terminal_modes;
pub mod tracing_setup;
