//! Utilities for creating `rodio` sinks from downloaded previews.
//!
//! The helper here encapsulates decoding an in-memory clip and preparing a
//! paused `Sink` at the requested start position.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::PlaybackError;

/// Create a paused `Sink` for `clip` that starts playback at `start_at`.
///
/// Also returns the clip length when the container reports one.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    clip: &Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), PlaybackError> {
    let decoder = Decoder::new(Cursor::new(Arc::clone(clip)))?;
    let total = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
