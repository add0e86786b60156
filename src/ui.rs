//! UI rendering helpers for the terminal user interface.
//!
//! This module contains the screen layout, mouse hit-testing against it, and
//! the `ratatui` draw routine.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::config::UiSettings;
use crate::player::{PlaybackPort, PlayerState, format_clock};

const CONTROLS: [(&str, &str); 8] = [
    ("/ i", "search"),
    ("j/k", "up/down"),
    ("enter/click", "play"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("0-9", "seek"),
    ("click bar", "seek"),
    ("q", "quit"),
];

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Regions of the screen for a given terminal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub search: Rect,
    pub list: Rect,
    pub now_playing: Rect,
    pub progress: Rect,
    pub footer: Rect,
}

/// What a mouse click landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    /// The search box.
    Search,
    /// Index into the track list.
    ListRow(usize),
    /// Position along the progress bar, `0.0..1.0`.
    Progress(f64),
}

impl ScreenLayout {
    pub fn compute(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        Self {
            header: chunks[0],
            search: chunks[1],
            list: chunks[2],
            now_playing: chunks[3],
            progress: chunks[4],
            footer: chunks[5],
        }
    }

    /// Rows available for list entries inside the border.
    pub fn list_inner(&self) -> Rect {
        Block::bordered().inner(self.list)
    }

    pub fn progress_inner(&self) -> Rect {
        Block::bordered().inner(self.progress)
    }

    /// Map a click at `(column, row)` to the region it landed on.
    ///
    /// `total` and `selected` must match what was drawn so rows line up with
    /// the scrolled window.
    pub fn hit_test(&self, column: u16, row: u16, total: usize, selected: usize) -> Option<Hit> {
        if contains(self.search, column, row) {
            return Some(Hit::Search);
        }

        let bar = self.progress_inner();
        if contains(bar, column, row) {
            // The right-most cell is the end of the clip.
            let offset = column - bar.x;
            let fraction = if offset + 1 == bar.width {
                1.0
            } else {
                f64::from(offset) / f64::from(bar.width)
            };
            return Some(Hit::Progress(fraction));
        }

        let list = self.list_inner();
        if contains(list, column, row) {
            let (start, end) = list_window(total, list.height as usize, selected);
            let index = start + (row - list.y) as usize;
            if index < end {
                return Some(Hit::ListRow(index));
            }
        }
        None
    }
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && column >= r.x
        && column < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

/// Visible `start..end` slice of a list of `total` entries in `height` rows,
/// keeping `selected` centered when the list is longer than the window.
pub fn list_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
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

/// Render the entire UI into the provided `frame`.
pub fn draw<P: PlaybackPort>(frame: &mut Frame, app: &App<P>, settings: &UiSettings) {
    let layout = ScreenLayout::compute(frame.area());

    // Header
    let header = Paragraph::new(settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vibetunes ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, layout.header);

    draw_search(frame, app, layout.search);
    draw_list(frame, app, &layout);
    draw_now_playing(frame, app, settings, layout.now_playing);
    draw_progress(frame, app, layout.progress);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding::left(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, layout.footer);
}

fn draw_search<P: PlaybackPort>(frame: &mut Frame, app: &App<P>, area: Rect) {
    let focused = app.focus == Focus::Search;
    let title = match app.pending_search() {
        Some(term) => format!(" artist (searching \"{term}\") "),
        None => " artist ".to_string(),
    };
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let block = Block::bordered()
        .title(title)
        .border_style(border)
        .padding(Padding::left(1));
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(app.query.as_str()).block(block), area);

    if focused && inner.width > 0 {
        let typed = app.query.chars().count() as u16;
        let x = inner.x + typed.min(inner.width.saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

fn draw_list<P: PlaybackPort>(frame: &mut Frame, app: &App<P>, layout: &ScreenLayout) {
    let block = Block::default().borders(Borders::ALL).title(" tracks ");

    if !app.list_visible() {
        let message = app.notice().map_or("", |n| n.message());
        let notice = Paragraph::new(message)
            .alignment(Alignment::Center)
            .italic()
            .block(block);
        frame.render_widget(notice, layout.list);
        return;
    }

    let tracks = app.controller.tracks();
    let current = app.controller.current_index();
    let total = tracks.len();
    let height = layout.list_inner().height as usize;
    let (start, end) = list_window(total, height, app.selected);

    // Only build items for the visible window.
    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let i = start + offset;
            let marker = if current == Some(i) { "♪ " } else { "  " };
            let line = Line::from(vec![
                Span::raw(marker),
                Span::raw(format!("{:>2}. ", i + 1)),
                Span::raw(track.display()),
                Span::raw("  "),
                Span::raw(format_clock(track.duration_secs)).dim(),
            ]);
            let item = ListItem::new(line);
            if current == Some(i) {
                item.bold()
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if total > 0 && app.focus == Focus::List {
        state.select(Some(app.selected.saturating_sub(start)));
    }
    frame.render_stateful_widget(list, layout.list, &mut state);
}

fn draw_now_playing<P: PlaybackPort>(
    frame: &mut Frame,
    app: &App<P>,
    settings: &UiSettings,
    area: Rect,
) {
    let block = Block::bordered()
        .title(" now playing ")
        .padding(Padding::left(1));

    let Some(np) = app.controller.now_playing() else {
        let idle = Paragraph::new(vec![
            Line::from("Search for an artist".bold()),
            Line::from("Results will appear here".dim()),
        ])
        .block(block);
        frame.render_widget(idle, area);
        return;
    };

    let glyph = match np.state {
        PlayerState::Playing => "▶",
        PlayerState::Paused | PlayerState::Idle => "⏸",
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{glyph} ")),
        Span::raw(np.track.title.as_str()).bold(),
        Span::raw(" - "),
        Span::raw(np.track.artist.as_str()),
    ])];
    if settings.show_cover_url && !np.track.cover_url.is_empty() {
        lines.push(Line::from(format!("Cover: {}", np.track.cover_url)).dim());
    }
    match np.unavailable {
        Some(_) => lines.push(Line::from("Track unavailable".red())),
        None => lines.push(Line::from(format!("{} / {}", np.elapsed, np.total))),
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_progress<P: PlaybackPort>(frame: &mut Frame, app: &App<P>, area: Rect) {
    let (ratio, label) = match app.controller.now_playing() {
        Some(np) => (
            (np.percent / 100.0).clamp(0.0, 1.0),
            format!("{} / {}", np.elapsed, np.total),
        ),
        None => (0.0, "0:00 / 0:00".to_string()),
    };

    let gauge = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}
