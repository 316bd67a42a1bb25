use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{OutputEngine, TransportDriver};
use crate::config;
use crate::ui;

/// Main terminal event loop: applies engine notifications, samples the
/// playback position, draws and handles input. Returns `Ok(())` when
/// shutdown is requested.
pub fn run<E: OutputEngine>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    driver: &mut TransportDriver<E>,
) -> Result<(), Box<dyn std::error::Error>> {
    let idle = Duration::from_millis(settings.ui.idle_poll_ms.max(1));

    loop {
        let now = Instant::now();
        driver.pump();
        driver.tick(now);
        app.expire_status(now);

        let transport = driver.state();
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                driver.session(),
                transport,
                &settings.ui,
                &settings.controls,
            )
        })?;

        let timeout = driver
            .next_tick_in(Instant::now())
            .map_or(idle, |t| t.min(idle));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, driver) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Dispatch one key press. Returns `true` when the user asked to quit.
fn handle_key_event<E: OutputEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    driver: &mut TransportDriver<E>,
) -> bool {
    if app.prompt.is_some() {
        match key.code {
            KeyCode::Esc => app.close_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => app.submit_prompt(&settings.library),
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    let scrub = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter => app.play_selected(driver),
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_playback(driver),
        KeyCode::Char('l') | KeyCode::Right => app.seek_by(driver, scrub),
        KeyCode::Char('h') | KeyCode::Left => app.seek_by(driver, -scrub),
        KeyCode::Char('+') | KeyCode::Char('=') => app.nudge_volume(driver, step),
        KeyCode::Char('-') => app.nudge_volume(driver, -step),
        KeyCode::Char('a') => app.open_prompt(),
        KeyCode::Char('d') => app.delete_selected(driver),
        _ => {}
    }

    false
}
