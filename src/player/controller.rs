use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::catalog::Track;
use crate::config::PlaybackSettings;

use super::clock::format_clock;
use super::port::{PlaybackPort, SourceId};

/// Transport state of the controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlayerState {
    /// No track loaded.
    #[default]
    Idle,
    /// A track is loaded but not advancing.
    Paused,
    /// A track is loaded and audio is being produced.
    Playing,
}

#[derive(Copy, Clone, Debug)]
pub struct ControllerOptions {
    /// Period of the progress tick while playing.
    pub tick_period: Duration,
    /// Let the tick detect end-of-track from `elapsed >= total`.
    pub tick_end_check: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            tick_end_check: false,
        }
    }
}

impl From<&PlaybackSettings> for ControllerOptions {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            tick_period: Duration::from_millis(s.tick_ms.max(1)),
            tick_end_check: s.tick_end_check,
        }
    }
}

/// Display snapshot of the loaded track.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying<'a> {
    pub index: usize,
    pub track: &'a Track,
    pub state: PlayerState,
    /// Elapsed time as `M:SS`.
    pub elapsed: String,
    /// Track length as `M:SS`.
    pub total: String,
    /// Progress through the playing source, `0.0..=100.0`.
    pub percent: f64,
    /// Set when the preview could not be played.
    pub unavailable: Option<&'a str>,
}

/// Owns the track list and playback state; the only writer of either.
pub struct Controller<P: PlaybackPort> {
    port: P,
    options: ControllerOptions,

    tracks: Vec<Track>,
    current: Option<usize>,
    source: Option<SourceId>,
    state: PlayerState,
    elapsed: f64,

    /// Next due time of the progress tick; `Some` only while playing.
    next_tick: Option<Instant>,
    /// End-of-track already handled for `source`.
    finished: bool,
    unavailable: Option<String>,
}

impl<P: PlaybackPort> Controller<P> {
    pub fn new(port: P, options: ControllerOptions) -> Self {
        Self {
            port,
            options,
            tracks: Vec::new(),
            current: None,
            source: None,
            state: PlayerState::Idle,
            elapsed: 0.0,
            next_tick: None,
            finished: false,
            unavailable: None,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn is_loaded(&self) -> bool {
        self.source.is_some() && self.current.is_some()
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Elapsed seconds of the loaded track.
    #[cfg(test)]
    pub(crate) fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[cfg(test)]
    pub(crate) fn tick_active(&self) -> bool {
        self.next_tick.is_some()
    }

    #[cfg(test)]
    pub(crate) fn next_tick_at(&self) -> Option<Instant> {
        self.next_tick
    }

    #[cfg(test)]
    pub(crate) fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Replace the track list with a fresh search result.
    ///
    /// A non-empty list loads its first entry paused; an empty one stops
    /// playback and leaves nothing loaded.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        if self.tracks.is_empty() {
            self.port.stop();
            self.current = None;
            self.source = None;
            self.state = PlayerState::Idle;
            self.elapsed = 0.0;
            self.next_tick = None;
            self.finished = false;
            self.unavailable = None;
        } else {
            self.load(0);
        }
    }

    /// Load the track at `index`, paused at 0. Returns false for a bad index.
    pub fn load(&mut self, index: usize) -> bool {
        let Some(track) = self.tracks.get(index) else {
            return false;
        };

        let source = self.port.load(&track.preview_url);
        debug!(index, source, title = %track.title, "loaded track");

        self.current = Some(index);
        self.source = Some(source);
        self.state = PlayerState::Paused;
        self.elapsed = 0.0;
        self.next_tick = None;
        self.finished = false;
        self.unavailable = None;
        true
    }

    /// Start output of the loaded track and the progress tick.
    pub fn play(&mut self) {
        if !self.is_loaded() || self.state == PlayerState::Playing {
            return;
        }
        if self.unavailable.is_some() {
            debug!("not playing an unavailable track");
            return;
        }

        self.port.play();
        self.state = PlayerState::Playing;
        self.next_tick = Some(Instant::now() + self.options.tick_period);
    }

    pub fn pause(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }

        self.port.pause();
        self.elapsed = self.port.current_time();
        self.state = PlayerState::Paused;
        self.next_tick = None;
    }

    /// Play/pause control; does nothing while idle.
    pub fn toggle(&mut self) {
        match self.state {
            PlayerState::Idle => {}
            PlayerState::Paused => self.play(),
            PlayerState::Playing => self.pause(),
        }
    }

    /// Load `index` and start playing it (track list click).
    pub fn play_index(&mut self, index: usize) {
        if self.load(index) {
            self.play();
        }
    }

    pub fn next(&mut self) {
        self.step(true);
    }

    pub fn previous(&mut self) {
        self.step(false);
    }

    fn step(&mut self, forward: bool) {
        let n = self.tracks.len();
        if n == 0 {
            return;
        }

        let was_playing = self.state == PlayerState::Playing;
        let i = self.current.unwrap_or(0);
        let target = if forward { (i + 1) % n } else { (i + n - 1) % n };

        self.load(target);
        if was_playing {
            self.play();
        }
    }

    /// Seek to `fraction` of the clip. Only honoured while playing and once
    /// the port knows the clip's length.
    pub fn seek(&mut self, fraction: f64) {
        if self.state != PlayerState::Playing {
            return;
        }
        let Some(total) = self.total_secs() else {
            return;
        };

        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = fraction * total;

        debug!(fraction, target, "seek");
        self.port.seek(target);
        self.elapsed = target;
    }

    /// Whether the progress tick is due at `now`; reschedules it if so.
    pub fn tick_due(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_tick else {
            return false;
        };
        if now < due {
            return false;
        }

        let period = self.options.tick_period;
        let mut next = due + period;
        if next <= now {
            // We fell behind (e.g. a long redraw); don't fire a burst of ticks.
            next = now + period;
        }
        self.next_tick = Some(next);
        true
    }

    /// Sample progress from the port.
    pub fn tick(&mut self) {
        if self.state != PlayerState::Playing {
            return;
        }

        self.elapsed = self.port.current_time();

        if self.options.tick_end_check {
            if let Some(total) = self.total_secs() {
                if self.elapsed >= total {
                    debug!(elapsed = self.elapsed, total, "tick reached end of track");
                    self.advance_after_end();
                }
            }
        }
    }

    /// End-of-track signal from the port.
    pub fn track_ended(&mut self, source: SourceId) {
        if self.source != Some(source) {
            debug!(source, current = ?self.source, "ignoring end of a replaced source");
            return;
        }
        self.advance_after_end();
    }

    /// The port could not play `source`.
    pub fn track_failed(&mut self, source: SourceId, reason: &str) {
        if self.source != Some(source) {
            debug!(source, "ignoring failure of a replaced source");
            return;
        }

        warn!(source, reason, title = ?self.current_track().map(|t| &t.title), "track unavailable");
        self.unavailable = Some(reason.to_string());
        if self.state == PlayerState::Playing {
            self.port.pause();
            self.state = PlayerState::Paused;
            self.next_tick = None;
        }
    }

    fn advance_after_end(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.next();
    }

    /// Length of the loaded clip as decoded by the port. The catalog
    /// duration is the full song and only ever labels the panel.
    fn total_secs(&self) -> Option<f64> {
        self.port.duration().filter(|d| d.is_finite() && *d > 0.0)
    }

    pub fn now_playing(&self) -> Option<NowPlaying<'_>> {
        let index = self.current?;
        let track = self.tracks.get(index)?;

        let percent = match self.total_secs() {
            Some(total) => (self.elapsed / total * 100.0).clamp(0.0, 100.0),
            None => 0.0,
        };

        Some(NowPlaying {
            index,
            track,
            state: self.state,
            elapsed: format_clock(self.elapsed.max(0.0) as u64),
            total: format_clock(track.duration_secs),
            percent,
            unavailable: self.unavailable.as_deref(),
        })
    }
}
