//! Playback controller: transport state machine over an injected audio port.
//!
//! The `Controller` owns the track list, current index, play flag and elapsed
//! time. It talks to audio output only through the `PlaybackPort` trait, so the
//! real rodio backend and the test double are interchangeable.

mod clock;
mod controller;
mod port;

pub use clock::format_clock;
pub use controller::{Controller, ControllerOptions, NowPlaying, PlayerState};
pub use port::{EndedCallback, FailedCallback, PlaybackPort, SourceId};

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;
