use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::player::{EndedCallback, FailedCallback, SourceId};

use super::fetch::PreviewFetcher;
use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackError, PlaybackHandle, PlaybackInfo};

/// How often the thread wakes up to publish progress and detect the clip end.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

struct Loaded {
    source: SourceId,
    clip: Arc<[u8]>,
    sink: Sink,
    duration: Option<Duration>,
}

/// Everything the audio thread owns.
struct Deck {
    stream: Option<OutputStream>,
    fetcher: PreviewFetcher,
    info: PlaybackHandle,
    // Download workers post their result back through this.
    tx: Sender<AudioCmd>,

    loaded: Option<Loaded>,
    // Source whose download is still running.
    pending: Option<SourceId>,
    // Requested output state; a pending source starts playing once ready.
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,

    on_ended: Option<EndedCallback>,
    on_failed: Option<FailedCallback>,
}

pub(super) fn spawn_audio_thread(
    tx: Sender<AudioCmd>,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    fetcher: PreviewFetcher,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!(error = %e, "failed to open audio output; previews will be unavailable");
                None
            }
        };

        let mut deck = Deck {
            stream,
            fetcher,
            info: playback_info,
            tx,
            loaded: None,
            pending: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            on_ended: None,
            on_failed: None,
        };

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCmd::Load { source, url }) => deck.load(source, url),
                Ok(AudioCmd::Fetched { source, url, clip }) => deck.fetched(source, &url, clip),
                Ok(AudioCmd::Play) => deck.play(),
                Ok(AudioCmd::Pause) => deck.pause(),
                Ok(AudioCmd::Stop) => deck.unload(),
                Ok(AudioCmd::Seek(to)) => deck.seek(to),
                Ok(AudioCmd::OnEnded(cb)) => deck.on_ended = Some(cb),
                Ok(AudioCmd::OnFailed(cb)) => deck.on_failed = Some(cb),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    deck.quit(fade_out_ms);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => deck.poll(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("audio thread exiting");
    })
}

impl Deck {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    /// Update the shared snapshot, unless the port already moved on to a newer source.
    fn publish(&self, source: SourceId, update: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.info.lock() {
            if info.source == Some(source) {
                update(&mut *info);
            }
        }
    }

    fn is_superseded(&self, source: SourceId) -> bool {
        self.info
            .lock()
            .map(|info| info.source != Some(source))
            .unwrap_or(false)
    }

    /// Start downloading `url` on a worker thread. The command loop keeps
    /// serving transport and quit requests while the clip is in flight.
    fn load(&mut self, source: SourceId, url: String) {
        self.unload();
        if self.is_superseded(source) {
            debug!(source, "skipping load replaced before it started");
            return;
        }
        if self.stream.is_none() {
            self.fail(source, &url, &PlaybackError::NoOutputDevice);
            return;
        }

        self.pending = Some(source);
        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let clip = fetcher.fetch(&url);
            // The deck may have quit in the meantime.
            let _ = tx.send(AudioCmd::Fetched { source, url, clip });
        });
    }

    fn fetched(&mut self, source: SourceId, url: &str, clip: Result<Arc<[u8]>, PlaybackError>) {
        if self.pending != Some(source) {
            debug!(source, "dropping download of a replaced source");
            return;
        }
        self.pending = None;

        match clip.and_then(|clip| self.open(clip)) {
            Ok((clip, sink, duration)) => {
                debug!(source, url, ?duration, "preview ready");
                self.publish(source, |info| {
                    info.duration = duration;
                    info.elapsed = Duration::ZERO;
                });
                if !self.paused {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.loaded = Some(Loaded {
                    source,
                    clip,
                    sink,
                    duration,
                });
            }
            Err(e) => self.fail(source, url, &e),
        }
    }

    fn fail(&self, source: SourceId, url: &str, e: &PlaybackError) {
        warn!(source, url, error = %e, "preview unavailable");
        if let Some(cb) = &self.on_failed {
            cb(source, e.to_string());
        }
    }

    fn open(&self, clip: Arc<[u8]>) -> Result<(Arc<[u8]>, Sink, Option<Duration>), PlaybackError> {
        let stream = self.stream.as_ref().ok_or(PlaybackError::NoOutputDevice)?;
        let (sink, duration) = create_sink_at(stream, &clip, Duration::ZERO)?;
        Ok((clip, sink, duration))
    }

    fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            loaded.sink.stop();
        }
        self.pending = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn play(&mut self) {
        let Some(loaded) = &self.loaded else {
            if self.pending.is_some() {
                self.paused = false;
            }
            return;
        };
        if !self.paused {
            return;
        }

        loaded.sink.play();
        self.paused = false;
        self.started_at = Some(Instant::now());
    }

    fn pause(&mut self) {
        let Some(loaded) = &self.loaded else {
            self.paused = true;
            return;
        };
        if self.paused {
            return;
        }

        loaded.sink.pause();
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;

        let elapsed = self.accumulated;
        self.publish(loaded.source, |info| info.elapsed = elapsed);
    }

    /// Rebuild the sink and skip into the clip.
    fn seek(&mut self, to: Duration) {
        let Some(stream) = self.stream.as_ref() else {
            return;
        };
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };

        let to = loaded.duration.map_or(to, |d| to.min(d));
        let new_sink = match create_sink_at(stream, &loaded.clip, to) {
            Ok((sink, _)) => sink,
            Err(e) => {
                warn!(source = loaded.source, error = %e, "seek failed");
                return;
            }
        };

        loaded.sink.stop();
        if self.paused {
            self.started_at = None;
        } else {
            new_sink.play();
            self.started_at = Some(Instant::now());
        }
        loaded.sink = new_sink;
        self.accumulated = to;

        let source = loaded.source;
        self.publish(source, |info| info.elapsed = to);
    }

    /// Periodic progress publication and end-of-clip detection.
    fn poll(&mut self) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        if self.paused {
            return;
        }

        let source = loaded.source;
        if loaded.sink.empty() {
            let total = loaded.duration.unwrap_or_else(|| self.elapsed());
            self.paused = true;
            self.started_at = None;
            self.accumulated = total;
            self.publish(source, |info| info.elapsed = total);

            debug!(source, "preview finished");
            if let Some(cb) = &self.on_ended {
                cb(source);
            }
        } else {
            let elapsed = self.elapsed();
            self.publish(source, |info| info.elapsed = elapsed);
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(loaded) = &self.loaded {
            if !self.paused {
                // Fade out gently before stopping.
                fade_out_sink(&loaded.sink, fade_out_ms);
            }
            loaded.sink.stop();
        }
        self.loaded = None;
        self.pending = None;
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
