use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

mod app;
mod browser;
mod error;
mod keys;
mod model;
mod shell;
mod ssh;
mod storage;
mod ui;

use app::{App, AppOptions};
use model::{AppAction, Profile};
use ssh::SshConnector;

const TICK_RATE: Duration = Duration::from_millis(100);
const TRACE_FILE_NAME: &str = "sftp-deck.log";
const DEFAULT_TRACE_FILTER: &str = "sftp_deck=info";

type Backend = CrosstermBackend<io::Stdout>;

/// Terminal manager for saved SSH servers with an SFTP file workbench.
#[derive(Debug, Parser)]
#[command(name = "sftp-deck", version, about)]
struct Cli {
    /// Profile store to use instead of the per-user config file.
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Directory for the activity and diagnostic logs.
    #[arg(long, value_name = "PATH")]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_dir = match cli.log_dir {
        Some(dir) => dir,
        None => storage::log_dir()?,
    };
    init_tracing(&log_dir);

    let store_path = match cli.store {
        Some(path) => path,
        None => storage::config_path()?,
    };
    let options = AppOptions {
        store_path,
        log_dir,
    };
    let mut app = App::load(options, Box::new(SshConnector))?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = run_app(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = &result {
        tracing::error!("exiting with error: {err:#}");
    }
    result
}

/// Diagnostics go to a file so they never paint over the TUI.
fn init_tracing(log_dir: &Path) {
    if fs::create_dir_all(log_dir).is_err() {
        return;
    }
    let file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(TRACE_FILE_NAME))
    {
        Ok(file) => file,
        Err(_) => return,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACE_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_app(terminal: &mut Terminal<Backend>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw_ui(frame, app))?;

        if event::poll(TICK_RATE)? {
            match event::read()? {
                Event::Key(key) => {
                    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(key.code, KeyCode::Char('c'));
                    if ctrl_c {
                        return Ok(());
                    }
                    if app.handle_key(key)? {
                        return Ok(());
                    }
                }
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }

        if let Some(action) = app.pending_action.take() {
            match action {
                AppAction::OpenShell(profile) => suspend_and_run(terminal, app, &profile)?,
                AppAction::CopyFile(name) => {
                    terminal.draw(|frame| ui::draw_ui(frame, app))?;
                    app.run_copy(&name);
                }
            }
        }
    }
}

/// Hands the terminal to an interactive ssh child and takes it back afterwards.
fn suspend_and_run(terminal: &mut Terminal<Backend>, app: &mut App, profile: &Profile) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .context("leave alternate screen")?;
    terminal.show_cursor().ok();

    app.run_shell(profile);

    enable_raw_mode().context("enable raw mode")?;
    execute!(
        terminal.backend_mut(),
        EnterAlternateScreen,
        EnableBracketedPaste
    )
    .context("enter alternate screen")?;
    terminal.clear().context("clear terminal")?;
    Ok(())
}
