use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vibetunes/config.toml` or `~/.config/vibetunes/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VIBETUNES__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub audio: AudioSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Base URL of the search service; `/search` is appended.
    pub base_url: String,
    /// Maximum number of results requested per search.
    pub limit: u32,
    /// Catalog entity type to filter on.
    pub entity: String,
    /// Edge length (pixels) of the cover art URL handed to the UI and MPRIS.
    pub artwork_size: u32,
    /// Request timeout for a search (seconds).
    pub timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://itunes.apple.com".to_string(),
            limit: 15,
            entity: "song".to_string(),
            artwork_size: 300,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Timeout for downloading a preview clip (seconds).
    pub fetch_timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 300,
            fetch_timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Period of the progress tick while playing (milliseconds).
    pub tick_ms: u64,
    /// Also treat "elapsed >= duration" seen by the tick as end-of-track.
    ///
    /// The audio backend already signals the end of a clip, so this is off by default.
    pub tick_end_check: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            tick_end_check: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the now-playing panel shows the cover art URL.
    pub show_cover_url: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ 30 seconds of everything ~ ".to_string(),
            show_cover_url: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for the rolling log file. Defaults to the XDG state dir.
    pub directory: Option<String>,
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub filter: Option<String>,
}
