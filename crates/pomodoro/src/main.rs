//! pomodoro - Pomodoro timer with a todo list and productivity statistics
//!
//! Usage:
//!   pomodoro                     Open the interactive menu
//!   pomodoro --data-dir DIR      Keep tasks, sessions and settings in DIR
//!   pomodoro --no-notify         Skip desktop notifications
//!   pomodoro --no-color          Plain output

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pomodoro::display::Display;
use pomodoro::notifier::DesktopNotifier;
use pomodoro::timer::SilentNotifier;
use pomodoro::app::GOODBYE;
use pomodoro::{App, CancelToken, StdinInput};
use pomodoro_core::Paths;

/// Pomodoro - focus timer, todo list and statistics
#[derive(Parser)]
#[command(name = "pomodoro")]
#[command(about = "Pomodoro timer with a todo list and productivity statistics")]
#[command(version)]
#[command(after_help = r#"MENU:
    1. Start Pomodoro Timer   pick a task, focus, then take the suggested break
    2. Manage Tasks           add, complete, delete, prioritize, export
    3. View Statistics        today, this week, all time, streak, best day
    4. Settings               durations and long-break interval
    5. Exit

    Press Ctrl+C during a countdown to pause it. A stopped pomodoro can
    still be counted as complete. Anywhere else Ctrl+C exits.

FILES:
    ~/.local/share/pomodoro/tasks.json      todo list
    ~/.local/share/pomodoro/sessions.json   session history
    ~/.config/pomodoro/settings.json        timer settings

LOGGING:
    RUST_LOG=debug pomodoro    # or --verbose
"#)]
struct Cli {
    /// Directory for tasks, sessions and settings
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Disable desktop notifications
    #[arg(long)]
    no_notify: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let paths = match &cli.data_dir {
        Some(dir) => Paths::rooted_at(dir),
        None => Paths::new(),
    };
    debug!(data = %paths.data.display(), config = %paths.config.display(), "paths");

    // Ctrl+C pauses a running countdown and quits anywhere else
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        if !handler_token.request_stop() {
            println!("\n\n{}", GOODBYE);
            std::process::exit(0);
        }
    })
    .context("Failed to install Ctrl+C handler")?;

    let display = if cli.no_color {
        Display::new(false)
    } else {
        Display::detect()
    };

    let app = App::open(paths, StdinInput, io::stdout())
        .context("Failed to open pomodoro data")?
        .with_cancel(cancel)
        .with_display(display);

    let mut app = if cli.no_notify {
        app.with_notifier(SilentNotifier)
    } else {
        app.with_notifier(DesktopNotifier)
    };

    app.run()
}
