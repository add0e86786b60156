use std::io::Stdout;
use std::sync::{Arc, mpsc};

use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::CatalogClient;
use crate::mpris::ControlCmd;
use crate::player::{Controller, ControllerOptions, PlaybackPort};

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

use event_loop::{AppEvent, EventLoopState, LoopContext};

pub fn run() -> anyhow::Result<()> {
    let (settings, settings_warning) = settings::load_settings();
    let _log_guard = logging::init(&settings.logging)?;
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting vibetunes");

    let client = CatalogClient::new(settings.catalog.clone())
        .context("failed to build the catalog HTTP client")?;
    let mut audio_player =
        AudioPlayer::new(&settings.audio).context("failed to start the audio backend")?;

    // Port callbacks fire on the audio thread; route them through the loop.
    let (events_tx, events_rx) = mpsc::channel::<AppEvent>();
    let ended_tx = events_tx.clone();
    audio_player.on_ended(Box::new(move |source| {
        let _ = ended_tx.send(AppEvent::TrackEnded(source));
    }));
    let failed_tx = events_tx.clone();
    audio_player.on_failed(Box::new(move |source, reason| {
        let _ = failed_tx.send(AppEvent::TrackFailed { source, reason });
    }));

    let controller = Controller::new(audio_player, ControllerOptions::from(&settings.playback));
    let mut app = App::new(controller);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    let mut terminal = setup_terminal()?;

    let ctx = LoopContext {
        settings: &settings,
        client: Arc::new(client),
        mpris: &mpris,
        events_tx,
        events_rx: &events_rx,
        control_rx: &control_rx,
    };
    let mut state = EventLoopState::new();
    let run_result = event_loop::run(&mut terminal, &ctx, &mut app, &mut state);

    restore_terminal(&mut terminal)?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    run_result
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter the alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
