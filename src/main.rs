use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::{io, time::{Duration, Instant}};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing_subscriber::EnvFilter;

use love_airlines::app::App;
use love_airlines::catalog::Catalog;
use love_airlines::config::{Args, Settings};
use love_airlines::ui;

/// Logs go to a file only; stdout belongs to the terminal UI.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .init();
        }
    }
    Ok(())
}

fn load_catalog(settings: &Settings) -> anyhow::Result<Catalog> {
    match &settings.catalog {
        Some(path) => {
            let catalog = Catalog::from_path(path)
                .with_context(|| format!("loading catalog {}", path.display()))?;
            tracing::info!(path = %path.display(), options = catalog.len(), "catalog loaded");
            Ok(catalog)
        }
        None => {
            let catalog = Catalog::builtin();
            tracing::info!(options = catalog.len(), "using built-in catalog");
            Ok(catalog)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_args(Args::parse());
    init_logging(settings.log_file.as_deref())?;
    tracing::info!(?settings, "starting love-airlines");

    let catalog = load_catalog(&settings)?;

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let app = App::new(settings, catalog);
    let res = run_app(&mut terminal, app);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        // Passport stamp timer
        app.tick(Instant::now());

        terminal.draw(|f| ui::ui(f, &app))?;

        // Use poll instead of read to avoid blocking
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
