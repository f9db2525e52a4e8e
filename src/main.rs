mod app;
mod catalog;
mod config;
mod deck;
mod export;
mod gesture;
mod motion;
mod session;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, AppMode};
use config::Config;
use deck::Decision;
use session::Session;

/// Animation frame interval for the event loop.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "swipedeck")]
#[command(about = "Review a deck of items one at a time: keep, skip, undo, export")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "~/.config/swipedeck/config.toml")]
    config: String,

    /// Catalog file (JSON array of items); overrides the configured path
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swipedeck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    // Load config and catalog
    let config = Config::load(&cli.config)?;
    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog_path.clone());
    let items = catalog::load(&catalog_path)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let session = Session::new(items, config.motion.clone(), config.export.clone());
    let mut app = App::new(session, config);

    // Run main loop
    let result = run_app(&mut terminal, &mut app).await;
    app.teardown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        app.set_viewport(terminal.size()?.width);
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(FRAME_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key(app, key.code, key.modifiers).await {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }

        let now = Instant::now();
        app.tick(now - last_frame);
        last_frame = now;
    }
}

/// Returns true when the app should quit.
async fn handle_key(
    app: &mut App,
    code: KeyCode,
    modifiers: event::KeyModifiers,
) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Char('c') if modifiers.contains(event::KeyModifiers::CONTROL) => {
            return true;
        }
        _ => {}
    }

    match app.mode() {
        AppMode::Reviewing => match code {
            KeyCode::Left | KeyCode::Char('h') => app.swipe(Decision::Reject),
            KeyCode::Right | KeyCode::Char('l') => app.swipe(Decision::Accept),
            KeyCode::Char('u') => app.undo(),
            KeyCode::Char('r') => app.restart(),
            KeyCode::Enter | KeyCode::Char(' ') => app.toggle_expanded(),
            _ => {}
        },
        AppMode::Results => match code {
            KeyCode::Char('e') => app.export().await,
            KeyCode::Char('r') => app.restart(),
            KeyCode::Char('u') => app.undo(),
            _ => {}
        },
    }
    false
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.pointer_down(mouse.column, mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.pointer_move(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.pointer_up();
        }
        _ => {}
    }
}
