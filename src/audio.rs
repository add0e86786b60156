//! rodio-backed implementation of the playback port.
//!
//! `AudioPlayer` is a thin handle: it forwards commands to a dedicated audio
//! thread and reads progress back from a shared `PlaybackInfo` snapshot. The
//! thread hands each download to a short-lived worker, decodes the clip from
//! memory once it arrives and reports end-of-clip and failures through the
//! callbacks registered on the port.

mod fetch;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
