//! Audio-related small types and handles.
//!
//! This module defines the command set of the audio thread, the playback
//! snapshot it publishes and the errors it can report.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::player::{EndedCallback, FailedCallback, SourceId};

pub(crate) enum AudioCmd {
    /// Download `url` in the background and prepare it at 0 under the given
    /// source id, paused unless `Play` arrives first.
    Load { source: SourceId, url: String },
    /// A download worker finished fetching the clip for `source`.
    Fetched {
        source: SourceId,
        url: String,
        clip: Result<Arc<[u8]>, PlaybackError>,
    },
    /// Resume/start output of the loaded source.
    Play,
    /// Pause output.
    Pause,
    /// Drop the loaded source.
    Stop,
    /// Restart the loaded source at the given offset.
    Seek(Duration),
    /// Register the end-of-source callback.
    OnEnded(EndedCallback),
    /// Register the failure callback.
    OnFailed(FailedCallback),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the port handle.
pub(crate) struct PlaybackInfo {
    /// Source the fields below describe.
    pub source: Option<SourceId>,
    /// Elapsed playback time of the source.
    pub elapsed: Duration,
    /// Decoded length of the source, when the container reports it.
    pub duration: Option<Duration>,
}

pub(crate) type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Reasons a preview cannot be played.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("preview download failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("preview server responded with HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("preview could not be decoded: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("no audio output device available")]
    NoOutputDevice,
}
