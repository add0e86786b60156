//! In-memory `PlaybackPort` for tests.

use super::port::{EndedCallback, FailedCallback, PlaybackPort, SourceId};

#[derive(Default)]
pub(crate) struct FakePort {
    pub loaded: Vec<String>,
    pub playing: bool,
    pub position: f64,
    pub length: Option<f64>,
    pub seeks: Vec<f64>,
    pub play_calls: usize,
    pub stops: usize,
    last_source: SourceId,
    ended: Option<EndedCallback>,
    failed: Option<FailedCallback>,
}

impl FakePort {
    pub fn with_length(secs: f64) -> Self {
        Self {
            length: Some(secs),
            ..Self::default()
        }
    }

    pub fn last_source(&self) -> SourceId {
        self.last_source
    }

    pub fn fire_ended(&self, source: SourceId) {
        if let Some(cb) = &self.ended {
            cb(source);
        }
    }

    pub fn fire_failed(&self, source: SourceId, reason: &str) {
        if let Some(cb) = &self.failed {
            cb(source, reason.to_string());
        }
    }
}

impl PlaybackPort for FakePort {
    fn load(&mut self, url: &str) -> SourceId {
        self.loaded.push(url.to_string());
        self.playing = false;
        self.position = 0.0;
        self.last_source += 1;
        self.last_source
    }

    fn play(&mut self) {
        self.play_calls += 1;
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.playing = false;
        self.position = 0.0;
    }

    fn seek(&mut self, seconds: f64) {
        self.seeks.push(seconds);
        self.position = seconds;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.length
    }

    fn on_ended(&mut self, callback: EndedCallback) {
        self.ended = Some(callback);
    }

    fn on_failed(&mut self, callback: FailedCallback) {
        self.failed = Some(callback);
    }
}

/// `n` tracks with distinct ids and preview URLs, each `duration_secs` long.
pub(crate) fn sample_tracks(n: usize, duration_secs: u64) -> Vec<crate::catalog::Track> {
    (0..n)
        .map(|i| crate::catalog::Track {
            id: 1000 + i as u64,
            title: format!("Song {i}"),
            artist: "Daft Punk".to_string(),
            cover_url: format!("https://art/{i}/300x300bb.jpg"),
            preview_url: format!("https://preview/{i}.m4a"),
            duration_secs,
        })
        .collect()
}
