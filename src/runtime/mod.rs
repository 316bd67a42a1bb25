use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::app::App;
use crate::audio::{RodioEngine, TransportDriver};
use crate::store::Library;

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    logging::init(&settings);
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let db_path = settings
        .database_path()
        .ok_or("cannot locate a data directory; set library.database_path")?;
    let library = Library::open(&db_path).inspect_err(|e| {
        error!(path = %db_path.display(), error = %e, "failed to open library");
    })?;

    let mut app = App::new(
        library,
        Duration::from_millis(settings.ui.status_timeout_ms),
    )?;

    let inputs: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if !inputs.is_empty() {
        app.import_paths(&inputs, &settings.library);
    }

    let engine = RodioEngine::new()?;
    let mut driver = TransportDriver::new(
        engine,
        settings.audio.initial_volume,
        Duration::from_millis(settings.audio.sample_interval_ms),
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut driver);

    // Release the voice before the output stream goes away with the driver.
    driver.eject();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    run_result
}
