mod app;
mod config;
mod dialog;
mod error;
mod event;
mod logging;
mod settings;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use tracing::info;

use app::App;
use config::Config;
use dialog::SessionDialog;
use event::{AppEvent, EventHandler};
use settings::SessionStore;

#[derive(Parser)]
#[command(name = "sessman", about = "Session manager for terminal profiles", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file
    #[arg(short, long, default_value = "~/.config/sessman/config.toml")]
    config: String,

    /// Session store file, overrides the config
    #[arg(short, long)]
    settings: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List sessions, Default first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Make a session current
    Switch {
        name: String,
    },

    /// Rename a session
    Rename {
        old: String,
        new: String,
    },

    /// Copy a session under a new name
    Clone {
        source: String,
        new: String,
    },

    /// Delete a session
    Remove {
        name: String,
    },
}

#[derive(Serialize)]
struct SessionRow<'a> {
    name: &'a str,
    current: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    if let Err(e) = logging::init(&config.log_path(), &config.log.level) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let settings_path = match cli.settings {
        Some(ref path) => config::expand_tilde(path),
        None => config.settings_path(),
    };
    let mut store = SessionStore::load(&settings_path)
        .with_context(|| format!("Failed to load sessions from {}", settings_path.display()))?;

    match cli.command {
        Some(Commands::List { json }) => list_sessions(&store, json),
        Some(Commands::Switch { name }) => {
            store.switch(&name)?;
            save(&store, format!("Switched to session: {}", name))
        }
        Some(Commands::Rename { old, new }) => {
            store.rename(&old, &new)?;
            save(&store, format!("Renamed {} to {}", old, new))
        }
        Some(Commands::Clone { source, new }) => {
            store.clone_session(&source, &new)?;
            save(&store, format!("Cloned {} as {}", source, new))
        }
        Some(Commands::Remove { name }) => {
            store.remove(&name)?;
            save(&store, format!("Removed session: {}", name))
        }
        None => run_dialog(store, &config).await,
    }
}

fn list_sessions(store: &SessionStore, json: bool) -> Result<()> {
    let dialog = SessionDialog::new(store);
    let rows: Vec<SessionRow> = dialog
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| SessionRow {
            name: &entry.name,
            current: i == dialog.current(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<30} {:<8}", "NAME", "CURRENT");
    println!("{}", "-".repeat(39));
    for row in rows {
        let current = if row.current { "*" } else { "" };
        println!("{:<30} {:<8}", row.name, current);
    }

    Ok(())
}

fn save(store: &SessionStore, message: String) -> Result<()> {
    store.save()?;
    info!(path = %store.path().display(), "{}", message);
    println!("{}", message);
    Ok(())
}

async fn run_dialog(store: SessionStore, config: &Config) -> Result<()> {
    let mut app = App::new(store, config);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let result = event_loop(&mut terminal, &mut app, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut events = EventHandler::new(tick_rate);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if let Some(event) = events.next().await {
            match event {
                AppEvent::Key(key) => app.handle_key(key),
                AppEvent::Paste(text) => app.handle_paste(&text),
                AppEvent::Tick => app.clear_expired_status(Instant::now()),
                AppEvent::Resize => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!(current = app.dialog.current_name(), "session dialog closed");
    Ok(())
}
