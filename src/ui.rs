//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, StatusKind};
use crate::audio::{SessionState, TransportState};
use crate::config::{ControlsSettings, UiSettings};
use crate::library::{Track, format_duration};

const NOW_PLAYING_MARK: &str = "♫";
const IDLE_MARK: &str = "♪";

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(controls: &ControlsSettings) -> String {
    [
        "[j/k] up/down".to_string(),
        "[g/G] top/bottom".to_string(),
        "[enter] play selected".to_string(),
        "[space/p] play/pause".to_string(),
        format!("[h/l] seek -/+{}s", controls.scrub_seconds),
        "[-/+] volume".to_string(),
        "[a] add music".to_string(),
        "[d] remove".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Marker shown in front of a track row.
fn row_mark(track: &Track, session: &SessionState) -> &'static str {
    let is_current = session.current_track().is_some_and(|t| t.id == track.id);
    if is_current && session.is_playing() {
        NOW_PLAYING_MARK
    } else {
        IDLE_MARK
    }
}

/// Position within the time gauge, in `[0, 1]`. An unknown duration counts as one second.
fn time_ratio(session: &SessionState) -> f64 {
    let total = session.duration().max(Duration::from_secs(1));
    (session.current_time().as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

/// Compute the visible window `[start, end)` that keeps `selected` centred.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn draw_tracks(frame: &mut Frame, area: Rect, app: &App, session: &SessionState) {
    let total = app.tracks.len();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_window(total, height, app.selected);

    let items: Vec<ListItem> = app.tracks[start..end]
        .iter()
        .map(|track| {
            let mut spans = vec![
                Span::raw(format!("{} ", row_mark(track, session))),
                Span::raw(track.title.clone()).bold(),
            ];
            if !track.artist.is_empty() {
                spans.push(Span::raw(format!("  {}", track.artist)).dim());
            }
            spans.push(Span::raw(format!("  {}", format_duration(track.duration))));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(app.selected - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Glyph for the transport state shown next to the time.
fn transport_glyph(state: TransportState) -> &'static str {
    match state {
        TransportState::Playing => "▶",
        TransportState::Paused => "⏸",
        TransportState::Finished => "■",
        TransportState::Empty => "·",
    }
}

fn draw_now_playing(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    session: &SessionState,
    transport: TransportState,
) {
    let block = padded(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let (title, artist) = match session.current_track() {
        Some(track) => (track.title.clone(), track.artist.clone()),
        None => (
            "No Track Selected".to_string(),
            "Add music to get started".to_string(),
        ),
    };
    frame.render_widget(Paragraph::new(title).bold(), rows[0]);
    frame.render_widget(Paragraph::new(artist).dim(), rows[1]);

    let label = format!(
        "{} {} / {}",
        transport_glyph(transport),
        format_duration(session.current_time()),
        format_duration(session.duration())
    );
    let time = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(time_ratio(session))
        .label(label);
    frame.render_widget(time, rows[2]);

    let volume = f64::from(session.volume()).clamp(0.0, 1.0);
    let vol = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(volume)
        .label(format!("vol {:.0}%", volume * 100.0));
    frame.render_widget(vol, rows[3]);

    if let Some(status) = &app.status {
        let style = match status.kind {
            StatusKind::Info => Style::default(),
            StatusKind::Error => Style::default().fg(Color::Red),
        };
        let msg = Paragraph::new(status.text.as_str())
            .style(style)
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, rows[4]);
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    session: &SessionState,
    transport: TransportState,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(7),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_tracks(frame, chunks[1], app, session);
    draw_now_playing(frame, chunks[2], app, session, transport);

    let footer = match &app.prompt {
        Some(input) => Paragraph::new(format!("{input}█"))
            .block(padded(" add file or folder (enter to import, esc to cancel) ")),
        None => Paragraph::new(controls_text(controls_settings))
            .block(padded(" controls "))
            .wrap(Wrap { trim: true }),
    };
    frame.render_widget(footer, chunks[3]);
}
