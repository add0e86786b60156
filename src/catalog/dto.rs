//! Wire types for the iTunes Search API.
//!
//! Only the fields the player reads are declared; serde ignores the rest.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<SongResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SongResult {
    pub track_id: u64,
    pub track_name: String,
    pub artist_name: String,
    #[serde(rename = "artworkUrl100", default)]
    pub artwork_url_100: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Duration in milliseconds.
    #[serde(default)]
    pub track_time_millis: Option<u64>,
}
