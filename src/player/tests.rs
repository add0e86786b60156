use std::sync::mpsc;
use std::time::{Duration, Instant};

use super::fake::{FakePort, sample_tracks};
use super::*;

fn controller(port: FakePort) -> Controller<FakePort> {
    Controller::new(port, ControllerOptions::default())
}

fn loaded(n: usize) -> Controller<FakePort> {
    let mut c = controller(FakePort::with_length(30.0));
    c.set_tracks(sample_tracks(n, 200));
    c
}

#[test]
fn format_clock_pads_seconds_only() {
    assert_eq!(format_clock(75), "1:15");
    assert_eq!(format_clock(9), "0:09");
    assert_eq!(format_clock(0), "0:00");
    assert_eq!(format_clock(600), "10:00");
}

#[test]
fn starts_idle_and_ignores_transport() {
    let mut c = controller(FakePort::default());
    assert_eq!(c.state(), PlayerState::Idle);

    c.play();
    c.next();
    c.previous();
    c.seek(0.5);
    c.toggle();

    assert_eq!(c.state(), PlayerState::Idle);
    assert_eq!(c.current_index(), None);
    assert!(c.port().loaded.is_empty());
    assert_eq!(c.port().play_calls, 0);
    assert!(c.now_playing().is_none());
}

#[test]
fn set_tracks_auto_loads_first_paused_at_zero() {
    let c = loaded(3);
    assert_eq!(c.state(), PlayerState::Paused);
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.elapsed(), 0.0);
    assert!(!c.tick_active());
    assert_eq!(c.port().loaded, vec!["https://preview/0.m4a".to_string()]);

    let np = c.now_playing().unwrap();
    assert_eq!(np.track.title, "Song 0");
    assert_eq!(np.elapsed, "0:00");
    assert_eq!(np.total, "3:20");
    assert_eq!(np.percent, 0.0);
}

#[test]
fn empty_result_leaves_nothing_loaded() {
    let mut c = loaded(2);
    c.play();

    c.set_tracks(Vec::new());
    assert_eq!(c.state(), PlayerState::Idle);
    assert!(c.tracks().is_empty());
    assert_eq!(c.current_index(), None);
    assert!(!c.tick_active());
    assert_eq!(c.port().stops, 1);
    assert!(!c.port().playing);

    c.next();
    c.previous();
    assert_eq!(c.current_index(), None);
}

#[test]
fn next_then_previous_is_identity_for_every_start() {
    for n in 1..=5 {
        for start in 0..n {
            let mut c = loaded(n);
            assert!(c.load(start));

            c.next();
            c.previous();
            assert_eq!(c.current_index(), Some(start), "n={n} start={start} next/prev");

            c.previous();
            c.next();
            assert_eq!(c.current_index(), Some(start), "n={n} start={start} prev/next");
        }
    }
}

#[test]
fn next_and_previous_wrap_around() {
    let mut c = loaded(3);
    c.previous();
    assert_eq!(c.current_index(), Some(2));
    c.next();
    assert_eq!(c.current_index(), Some(0));
    c.load(2);
    c.next();
    assert_eq!(c.current_index(), Some(0));
}

#[test]
fn next_keeps_playing_only_if_it_was_playing() {
    let mut c = loaded(3);
    c.next();
    assert_eq!(c.state(), PlayerState::Paused);
    assert_eq!(c.port().play_calls, 0);

    c.play();
    c.next();
    assert_eq!(c.state(), PlayerState::Playing);
    assert_eq!(c.current_index(), Some(2));
    assert!(c.tick_active());
    assert!(c.port().playing);
}

#[test]
fn load_resets_to_paused_regardless_of_prior_state() {
    let mut c = loaded(3);
    c.play();
    c.port_mut().position = 12.0;
    c.tick();
    assert_eq!(c.elapsed(), 12.0);

    assert!(c.load(1));
    assert_eq!(c.state(), PlayerState::Paused);
    assert_eq!(c.elapsed(), 0.0);
    assert!(!c.tick_active());

    assert!(!c.load(99));
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn play_twice_is_idempotent() {
    let mut c = loaded(2);
    c.play();
    let first_due = c.next_tick_at();

    c.play();
    assert_eq!(c.state(), PlayerState::Playing);
    assert_eq!(c.port().play_calls, 1);
    assert!(c.tick_active());
    assert_eq!(c.next_tick_at(), first_due);
}

#[test]
fn pause_only_from_playing_and_cancels_tick() {
    let mut c = loaded(2);
    c.pause();
    assert_eq!(c.state(), PlayerState::Paused);

    c.play();
    c.port_mut().position = 4.0;
    c.pause();
    assert_eq!(c.state(), PlayerState::Paused);
    assert!(!c.tick_active());
    assert!(!c.port().playing);
    assert_eq!(c.elapsed(), 4.0);

    c.toggle();
    assert_eq!(c.state(), PlayerState::Playing);
    c.toggle();
    assert_eq!(c.state(), PlayerState::Paused);
}

#[test]
fn seek_half_of_two_hundred_seconds() {
    let mut c = controller(FakePort::with_length(200.0));
    c.set_tracks(sample_tracks(1, 200));
    c.play();

    c.seek(0.5);
    assert_eq!(c.port().seeks, vec![100.0]);
    assert_eq!(c.elapsed(), 100.0);
    assert_eq!(c.now_playing().unwrap().percent, 50.0);
    assert_eq!(c.now_playing().unwrap().elapsed, "1:40");
}

#[test]
fn seek_is_ignored_unless_playing_and_clamped() {
    let mut c = controller(FakePort::with_length(30.0));
    c.set_tracks(sample_tracks(1, 200));

    c.seek(0.5);
    assert!(c.port().seeks.is_empty());

    c.play();
    c.seek(1.7);
    c.seek(-0.2);
    c.seek(f64::NAN);
    assert_eq!(c.port().seeks, vec![30.0, 0.0, 0.0]);
}

#[test]
fn seek_waits_for_the_decoded_length() {
    let mut c = controller(FakePort::default());
    c.set_tracks(sample_tracks(1, 369));
    c.play();
    c.seek(0.5);
    assert!(c.port().seeks.is_empty());

    let np = c.now_playing().unwrap();
    assert_eq!(np.percent, 0.0);
    assert_eq!(np.total, "6:09");

    c.port_mut().length = Some(30.0);
    c.seek(0.5);
    assert_eq!(c.port().seeks, vec![15.0]);
}

#[test]
fn tick_due_fires_once_per_period_while_playing() {
    let mut c = loaded(1);
    let now = Instant::now();
    assert!(!c.tick_due(now + Duration::from_secs(5)));

    c.play();
    assert!(!c.tick_due(Instant::now()));

    let later = Instant::now() + Duration::from_millis(1001);
    assert!(c.tick_due(later));
    assert!(!c.tick_due(later));
    assert!(c.tick_due(later + Duration::from_secs(1)));

    c.pause();
    assert!(!c.tick_due(later + Duration::from_secs(10)));
}

#[test]
fn tick_updates_progress() {
    let mut c = loaded(2);
    c.play();
    c.port_mut().position = 15.0;
    c.tick();

    let np = c.now_playing().unwrap();
    assert_eq!(np.elapsed, "0:15");
    assert_eq!(np.percent, 50.0);
    assert_eq!(c.current_index(), Some(0));
}

#[test]
fn tick_does_not_advance_without_end_check() {
    let mut c = loaded(2);
    c.play();
    c.port_mut().position = 30.0;
    c.tick();
    assert_eq!(c.current_index(), Some(0));
}

#[test]
fn tick_end_check_auto_advances_and_keeps_playing() {
    let options = ControllerOptions {
        tick_end_check: true,
        ..ControllerOptions::default()
    };
    let mut c = Controller::new(FakePort::with_length(30.0), options);
    c.set_tracks(sample_tracks(3, 200));
    c.play();

    c.port_mut().position = 30.0;
    c.tick();
    assert_eq!(c.current_index(), Some(1));
    assert_eq!(c.state(), PlayerState::Playing);
    assert_eq!(c.elapsed(), 0.0);
}

#[test]
fn ended_signal_advances_once_and_ignores_stale_sources() {
    let mut c = loaded(3);
    c.play();
    let first = c.port().last_source();

    c.track_ended(first);
    assert_eq!(c.current_index(), Some(1));
    assert_eq!(c.state(), PlayerState::Playing);

    // Same end reported again (e.g. by both paths) must not skip a track.
    c.track_ended(first);
    assert_eq!(c.current_index(), Some(1));
}

#[test]
fn ended_signal_after_tick_advance_is_ignored() {
    let options = ControllerOptions {
        tick_end_check: true,
        ..ControllerOptions::default()
    };
    let mut c = Controller::new(FakePort::with_length(30.0), options);
    c.set_tracks(sample_tracks(1, 30));
    c.play();
    let first = c.port().last_source();

    c.port_mut().position = 30.0;
    c.tick();
    // Single-entry list wraps onto itself with a fresh source.
    assert_eq!(c.current_index(), Some(0));
    assert_eq!(c.port().loaded.len(), 2);

    c.track_ended(first);
    assert_eq!(c.port().loaded.len(), 2);
}

#[test]
fn port_callbacks_carry_the_source_id() {
    let (tx, rx) = mpsc::channel();
    let mut c = loaded(2);
    let ended_tx = tx.clone();
    c.port_mut()
        .on_ended(Box::new(move |id| ended_tx.send(("ended", id)).unwrap()));
    c.port_mut()
        .on_failed(Box::new(move |id, _| tx.send(("failed", id)).unwrap()));

    let id = c.port().last_source();
    c.port().fire_ended(id);
    c.port().fire_failed(id, "boom");
    assert_eq!(rx.try_recv().unwrap(), ("ended", id));
    assert_eq!(rx.try_recv().unwrap(), ("failed", id));
}

#[test]
fn failed_track_is_unavailable_until_skipped() {
    let mut c = loaded(2);
    c.play();
    let id = c.port().last_source();

    c.track_failed(id, "HTTP 404");
    assert_eq!(c.state(), PlayerState::Paused);
    assert!(!c.tick_active());
    assert_eq!(c.now_playing().unwrap().unavailable, Some("HTTP 404"));

    c.play();
    assert_eq!(c.state(), PlayerState::Paused);

    c.next();
    assert_eq!(c.current_index(), Some(1));
    assert!(c.now_playing().unwrap().unavailable.is_none());
    c.play();
    assert_eq!(c.state(), PlayerState::Playing);

    // A failure for the replaced source changes nothing.
    c.track_failed(id, "late");
    assert_eq!(c.state(), PlayerState::Playing);
}

#[test]
fn options_come_from_playback_settings() {
    let settings = crate::config::PlaybackSettings {
        tick_ms: 250,
        tick_end_check: true,
    };
    let o = ControllerOptions::from(&settings);
    assert_eq!(o.tick_period, Duration::from_millis(250));
    assert!(o.tick_end_check);
}
