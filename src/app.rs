//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the playback controller,
//! the search box and the list cursor.

mod model;

pub use model::*;
