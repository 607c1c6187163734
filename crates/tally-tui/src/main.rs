use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tally_db::Db;
use tally_service::{CategoryService, LocalService};
use tally_tui::app::{App, AppOptions};
use tally_tui::config::TuiConfig;
use tracing_subscriber::EnvFilter;

/// How long to wait for a key before checking for settled calls.
const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let config = TuiConfig::parse();
    init_logging(&config.log_path())?;

    let db_path = config.db_path();
    tracing::info!("tally starting (db: {})", db_path.display());
    let db = Db::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let service: Arc<dyn CategoryService> = Arc::new(LocalService::new(db));

    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let app = App::new(service, rt.handle().clone(), AppOptions::from(&config));

    let picked = run_tui(app)?;
    if let Some(category) = picked {
        println!("{}", serde_json::to_string(&category)?);
    }
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_tui(app: App) -> Result<Option<tally_core::Category>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("tally exited with error: {e}");
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<Option<tally_core::Category>> {
    loop {
        app.pump();
        if app.should_quit() {
            break;
        }

        terminal.draw(|frame| app.render(frame))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            app.handle_key(key);
        }
    }

    Ok(app.picked())
}
