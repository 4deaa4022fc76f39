use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{
    poll as event_poll, read as event_read, Event as CrosstermEvent, KeyEventKind,
};
use ratatui::Terminal;
use shellpane::app::{App, AppOptions};
use shellpane::config::Config;
use shellpane::services::{log_dirs, terminal_modes, tracing_setup};
use shellpane::session::SessionStore;
use std::{io, path::PathBuf, time::Duration};

/// An interactive shell console for the terminal
#[derive(Parser, Debug)]
#[command(name = "shellpane")]
#[command(about = "An interactive shell console with a protected scrollback", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: platform state dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Shell program to run, overriding the configuration
    #[arg(long, value_name = "PROGRAM")]
    shell: Option<String>,

    /// Change the shell's working directory to DIR after it starts
    #[arg(long, value_name = "DIR")]
    project: Option<PathBuf>,

    /// Don't restore or save command history
    #[arg(long)]
    no_session: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// How long to wait for terminal input before checking the shell again
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

fn load_config(args: &Args) -> AnyhowResult<Config> {
    let mut config = Config::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(shell) = &args.shell {
        config.console.shell = Some(shell.clone());
        config.console.shell_args = None;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    // Handle --dump-config early (no terminal setup needed)
    if args.dump_config {
        let config = load_config(&args)?;
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let log_file = args.log_file.clone().unwrap_or_else(log_dirs::main_log_path);
    tracing_setup::init_global(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    tracing::info!("shellpane starting");

    let config = load_config(&args)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let session = if args.no_session {
        None
    } else {
        config.session_path().map(SessionStore::new)
    };

    let mut app = App::new(
        &config,
        AppOptions {
            project_dir: args.project.clone(),
            session,
        },
    );

    let result = {
        let _modes = terminal_modes::TerminalModes::enable()?;
        let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.clear()?;
        run_event_loop(&mut app, &mut terminal)
    };

    app.shutdown();

    if let Err(e) = &result {
        tracing::error!("Event loop failed: {:#}", e);
    }
    tracing::info!("shellpane exiting");
    result
}

fn run_event_loop(
    app: &mut App,
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    let mut needs_render = true;

    loop {
        if app.process_shell_events() {
            needs_render = true;
        }

        if app.should_quit() {
            break;
        }

        if needs_render {
            terminal.draw(|frame| app.render(frame))?;
            needs_render = false;
        }

        if !event_poll(POLL_TIMEOUT)? {
            continue;
        }

        match event_read()? {
            CrosstermEvent::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press && app.handle_key(key_event) {
                    needs_render = true;
                }
            }
            CrosstermEvent::Mouse(mouse_event) => {
                if app.handle_mouse(mouse_event) {
                    needs_render = true;
                }
            }
            CrosstermEvent::Resize(_, _) => {
                needs_render = true;
            }
            _ => {}
        }
    }

    Ok(())
}
