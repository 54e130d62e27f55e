//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, LineGauge, List, ListItem, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration, time::Instant};

use crate::app::{AccessState, App, LibraryState};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::library::Track;
use crate::playback::PlayerStatus;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("K", "details");
    map.insert("q", "quit");
    map
});

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = ["j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "K", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{scrub_seconds}s"))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format milliseconds as `MM:SS`.
pub fn format_mmss(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the slider's time label (elapsed/total/remaining) per `UiSettings`.
fn time_text(elapsed_ms: u64, total_ms: u64, ui: &UiSettings) -> Option<String> {
    let total = (total_ms > 0).then_some(total_ms);
    let parts: Vec<String> = ui
        .time_fields
        .iter()
        .filter_map(|f| match f {
            TimeField::Elapsed => Some(format_mmss(elapsed_ms)),
            TimeField::Total => total.map(format_mmss),
            TimeField::Remaining => {
                total.map(|t| format!("-{}", format_mmss(t.saturating_sub(elapsed_ms))))
            }
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join(&ui.time_separator))
}

fn status_text(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Idle => "Stopped",
        PlayerStatus::Preparing => "Loading",
        PlayerStatus::Playing => "Playing",
        PlayerStatus::Paused => "Paused",
    }
}

/// Artwork line for the now-playing bar; unresolved locators get a placeholder.
fn artwork_text(track: &Track, present: bool) -> String {
    match track.artwork.as_deref() {
        Some(loc) if present => format!("Art: {loc}"),
        _ => "Art: [no artwork]".to_string(),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }

    format!("{}:{:02} ({}s)", total_secs / 60, total_secs % 60, total_secs)
}

fn empty_list_text(app: &App) -> &'static str {
    match (app.access, app.library) {
        (AccessState::Denied, _) => "Storage access denied",
        (_, LibraryState::Scanning) => "Scanning…",
        (_, LibraryState::Failed) => "Library unavailable",
        (_, LibraryState::Ready) => "No music found",
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    now: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" khmusic ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    {
        let mut lines: Vec<Line> = Vec::new();
        let state = status_text(app.playback.status);
        match &app.playback.current {
            Some(track) => {
                lines.push(Line::from(format!("{} • {}", track.title, state)).bold());
                lines.push(Line::from(track.artist_or_unknown().to_string()));
                lines.push(Line::from(artwork_text(track, app.artwork_present)).dim());
            }
            None => {
                lines.push(Line::from(state));
                if let Some(dir) = &app.current_dir {
                    lines.push(Line::from(format!("Dir: {dir}")).dim());
                }
            }
        }
        let mut block = Block::bordered().padding(LEFT_PAD).title(" now playing ");
        if let Some(notice) = app.active_notice(now) {
            block = block.title_bottom(Line::from(format!(" {notice} ")).reversed());
        }
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            chunks[1],
        );
    }

    // Main list
    {
        let total = app.tracks.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));

        // Only build ListItems for the visible window, centred on the selection.
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let playing = app.playing_index();
        let items: Vec<ListItem> = if total == 0 {
            vec![
                ListItem::new(empty_list_text(app))
                    .style(Style::default().add_modifier(Modifier::ITALIC)),
            ]
        } else {
            app.tracks[start..end]
                .iter()
                .enumerate()
                .map(|(offset, track)| {
                    let item = ListItem::new(format!(
                        "{} - {}",
                        track.title,
                        track.artist_or_unknown()
                    ));
                    if playing == Some(start + offset) {
                        item.style(Style::default().add_modifier(Modifier::BOLD))
                    } else {
                        item
                    }
                })
                .collect()
        };

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!(" tracks ({total}) ")))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Seek slider
    {
        let duration = app.playback.duration_ms;
        let position = app.slider_position_ms();
        let ratio = if duration > 0 {
            (position as f64 / duration as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let label = time_text(position, duration, ui_settings).unwrap_or_default();
        let title = if app.slider.is_dragging() {
            " seek (release to jump) "
        } else {
            " position "
        };
        let gauge = LineGauge::default()
            .block(Block::bordered().padding(LEFT_PAD).title(title))
            .filled_style(Style::default().add_modifier(Modifier::BOLD))
            .ratio(ratio)
            .label(label);
        frame.render_widget(gauge, chunks[3]);
    }

    // Overlay detail popup (keeps list visible under it)
    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 10, chunks[2]);
        frame.render_widget(Clear, popup_area);

        let meta = match app.selected_track() {
            Some(track) => format!(
                "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nPath: {}\nArtwork: {}",
                track.title,
                track.artist_or_unknown(),
                track
                    .album_id
                    .map(|id| format!("{id:016x}"))
                    .unwrap_or_else(|| "-".to_string()),
                format_duration_mmss_ceil(track.duration()),
                track.location.display(),
                track.artwork.as_deref().unwrap_or("-"),
            ),
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(LEFT_PAD)
                    .borders(Borders::ALL)
                    .title(" details (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    let mut footer_text = controls_text(controls_settings.scrub_seconds);
    if !app.transport_enabled() {
        footer_text.push_str(" | transport unavailable");
    }
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[4]);
}
