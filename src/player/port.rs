//! The audio primitive the controller drives.

/// Identity of one [`PlaybackPort::load`] call.
pub type SourceId = u64;

/// Invoked when the source with the given id played to its end.
pub type EndedCallback = Box<dyn Fn(SourceId) + Send + 'static>;

/// Invoked when the source with the given id could not be fetched or decoded.
pub type FailedCallback = Box<dyn Fn(SourceId, String) + Send + 'static>;

/// Minimal media element: one loaded source, play/pause, seek and position.
///
/// Callbacks may fire on another thread; implementors must not call back into
/// the controller directly.
pub trait PlaybackPort {
    /// Replace the current source with `url`, paused at 0. Any previous source
    /// stops producing sound immediately.
    fn load(&mut self, url: &str) -> SourceId;

    fn play(&mut self);

    fn pause(&mut self);

    /// Drop the current source entirely.
    fn stop(&mut self);

    /// Jump to `seconds` from the start of the current source.
    fn seek(&mut self, seconds: f64);

    /// Playback position of the current source in seconds (0 when none).
    fn current_time(&self) -> f64;

    /// Length of the current source in seconds, once known.
    fn duration(&self) -> Option<f64>;

    fn on_ended(&mut self, callback: EndedCallback);

    fn on_failed(&mut self, callback: FailedCallback);
}
