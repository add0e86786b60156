use std::io::Stdout;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::debug;

use crate::app::{App, Focus};
use crate::audio::AudioPlayer;
use crate::catalog::{CatalogClient, SearchReply, spawn_search};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{PlaybackPort, PlayerState, SourceId};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui::{self, Hit, ScreenLayout};

/// Input poll timeout; also bounds how late a progress tick can run.
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Messages from worker threads back to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    Search(SearchReply),
    TrackEnded(SourceId),
    TrackFailed { source: SourceId, reason: String },
}

impl From<SearchReply> for AppEvent {
    fn from(reply: SearchReply) -> Self {
        Self::Search(reply)
    }
}

/// What the loop should do after an input event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    Search { seq: u64, term: String },
}

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Layout of the last drawn frame, for mouse hit-testing.
    pub layout: ScreenLayout,
    /// Loaded track id and state last emitted to MPRIS.
    last_mpris: Option<(Option<u64>, PlayerState)>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            layout: ScreenLayout::compute(Rect::default()),
            last_mpris: None,
        }
    }
}

/// Everything the loop needs besides the app itself.
pub struct LoopContext<'a> {
    pub settings: &'a config::Settings,
    pub client: Arc<CatalogClient>,
    pub mpris: &'a MprisHandle,
    pub events_tx: Sender<AppEvent>,
    pub events_rx: &'a Receiver<AppEvent>,
    pub control_rx: &'a Receiver<ControlCmd>,
}

/// Main terminal event loop: drains worker events, runs the progress tick,
/// draws, then handles MPRIS commands and terminal input. Returns `Ok(())`
/// when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ctx: &LoopContext<'_>,
    app: &mut App<AudioPlayer>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        while let Ok(ev) = ctx.events_rx.try_recv() {
            handle_app_event(ev, app);
        }

        app.tick(Instant::now());

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        let snapshot = (
            app.controller.current_track().map(|t| t.id),
            app.controller.state(),
        );
        if state.last_mpris != Some(snapshot) {
            update_mpris(ctx.mpris, app);
            state.last_mpris = Some(snapshot);
        }

        let frame = terminal.draw(|f| ui::draw(f, app, &ctx.settings.ui))?;
        state.layout = ScreenLayout::compute(frame.area);

        while let Ok(cmd) = ctx.control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return quit(ctx, app);
            }
        }

        if !event::poll(POLL_TIMEOUT)? {
            continue;
        }
        let outcome = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(key, app),
            Event::Mouse(mouse) => {
                handle_mouse_event(mouse, app, &state.layout);
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        };

        match outcome {
            KeyOutcome::Continue => {}
            KeyOutcome::Quit => return quit(ctx, app),
            KeyOutcome::Search { seq, term } => {
                spawn_search(ctx.client.clone(), seq, term, ctx.events_tx.clone());
            }
        }
    }
}

fn quit(ctx: &LoopContext<'_>, app: &App<AudioPlayer>) -> anyhow::Result<()> {
    debug!("shutting down");
    app.controller
        .port()
        .quit_softly(Duration::from_millis(ctx.settings.audio.quit_fade_out_ms));
    Ok(())
}

pub fn handle_app_event<P: PlaybackPort>(ev: AppEvent, app: &mut App<P>) {
    match ev {
        AppEvent::Search(reply) => {
            app.apply_search(reply);
        }
        AppEvent::TrackEnded(source) => app.track_ended(source),
        AppEvent::TrackFailed { source, reason } => app.track_failed(source, &reason),
    }
}

/// Apply an MPRIS command. Returns true when the app should quit.
pub fn handle_control_cmd<P: PlaybackPort>(cmd: ControlCmd, app: &mut App<P>) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => app.controller.play(),
        // No separate stopped state for a preview; stop behaves like pause.
        ControlCmd::Pause | ControlCmd::Stop => app.controller.pause(),
        ControlCmd::PlayPause => app.toggle_playback(),
        ControlCmd::Next => app.next_track(),
        ControlCmd::Prev => app.prev_track(),
    }
    false
}

pub fn handle_key_event<P: PlaybackPort>(key: KeyEvent, app: &mut App<P>) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    if app.focus == Focus::Search {
        match key.code {
            KeyCode::Esc => app.leave_search(),
            KeyCode::Backspace => app.pop_query_char(),
            KeyCode::Enter => {
                if let Some((seq, term)) = app.submit_search() {
                    return KeyOutcome::Search { seq, term };
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_query_char(c),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Esc => app.dismiss_notice(),
        KeyCode::Char('/') | KeyCode::Char('i') => app.focus_search(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.activate_selected(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_playback(),
        KeyCode::Char('l') => app.next_track(),
        KeyCode::Char('h') => app.prev_track(),
        KeyCode::Char(c) => {
            if let Some(d) = c.to_digit(10) {
                app.seek_digit(d);
            }
        }
        _ => {}
    }
    KeyOutcome::Continue
}

pub fn handle_mouse_event<P: PlaybackPort>(
    mouse: MouseEvent,
    app: &mut App<P>,
    layout: &ScreenLayout,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let total = app.controller.tracks().len();
            match layout.hit_test(mouse.column, mouse.row, total, app.selected) {
                Some(Hit::Search) => app.focus_search(),
                Some(Hit::ListRow(i)) => {
                    app.leave_search();
                    app.click_row(i);
                }
                Some(Hit::Progress(fraction)) => app.seek_fraction(fraction),
                None => {}
            }
        }
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_prev(),
        _ => {}
    }
}
