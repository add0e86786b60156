use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::config::AudioSettings;
use crate::player::{EndedCallback, FailedCallback, PlaybackPort, SourceId};

use super::fetch::PreviewFetcher;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackError, PlaybackHandle, PlaybackInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    last_source: SourceId,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(settings: &AudioSettings) -> Result<Self, PlaybackError> {
        let fetcher = PreviewFetcher::new(Duration::from_secs(settings.fetch_timeout_secs))?;

        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let audio_handle = spawn_audio_thread(tx.clone(), rx, playback_info.clone(), fetcher);

        Ok(Self {
            tx,
            playback: playback_info,
            last_source: 0,
            join: Mutex::new(Some(audio_handle)),
        })
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            warn!("audio thread is gone; command dropped");
        }
    }

    /// The snapshot for the current source, if the thread has caught up to it.
    fn current_info(&self) -> Option<PlaybackInfo> {
        let info = self.playback.lock().ok()?;
        (info.source == Some(self.last_source)).then(|| info.clone())
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl PlaybackPort for AudioPlayer {
    fn load(&mut self, url: &str) -> SourceId {
        self.last_source += 1;
        let source = self.last_source;

        // Reset the snapshot now so readers never see the previous source's
        // progress under the new id.
        if let Ok(mut info) = self.playback.lock() {
            *info = PlaybackInfo {
                source: Some(source),
                ..PlaybackInfo::default()
            };
        }

        self.send(AudioCmd::Load {
            source,
            url: url.to_string(),
        });
        source
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        if let Ok(mut info) = self.playback.lock() {
            *info = PlaybackInfo::default();
        }
        self.send(AudioCmd::Stop);
    }

    fn seek(&mut self, seconds: f64) {
        if !seconds.is_finite() || seconds < 0.0 {
            return;
        }
        self.send(AudioCmd::Seek(Duration::from_secs_f64(seconds)));
    }

    fn current_time(&self) -> f64 {
        self.current_info()
            .map_or(0.0, |info| info.elapsed.as_secs_f64())
    }

    fn duration(&self) -> Option<f64> {
        self.current_info()?.duration.map(|d| d.as_secs_f64())
    }

    fn on_ended(&mut self, callback: EndedCallback) {
        self.send(AudioCmd::OnEnded(callback));
    }

    fn on_failed(&mut self, callback: FailedCallback) {
        self.send(AudioCmd::OnFailed(callback));
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        // Don't block on the join here; quit_softly is the orderly path.
        let _ = self.tx.send(AudioCmd::Quit { fade_out_ms: 0 });
    }
}
