/// One playable preview from the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    /// Opaque catalog identifier (`trackId`).
    pub id: u64,
    pub title: String,
    pub artist: String,
    /// Cover art URL, already rewritten to the configured size.
    pub cover_url: String,
    /// URL of the ~30 second preview clip.
    pub preview_url: String,
    /// Full track length in whole seconds (not the preview length).
    pub duration_secs: u64,
}

impl Track {
    /// "Artist - Title", the label used in the track list.
    pub fn display(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.artist.trim(), self.title)
        }
    }
}
