use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CatalogSettings;

use super::dto::{SearchResponse, SongResult};
use super::model::Track;

const USER_AGENT: &str = concat!("vibetunes/", env!("CARGO_PKG_VERSION"));

/// Size token the API embeds in `artworkUrl100`.
const SMALL_ARTWORK_TOKEN: &str = "100x100bb";

/// Why a search produced no track list.
///
/// All variants are shown to the user as the same generic message; the detail
/// only goes to the log.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog responded with HTTP {0}")]
    Status(StatusCode),

    #[error("malformed catalog payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Blocking client for the catalog search endpoint.
pub struct CatalogClient {
    http: Client,
    settings: CatalogSettings,
}

impl CatalogClient {
    pub fn new(settings: CatalogSettings) -> Result<Self, SearchError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { http, settings })
    }

    /// Search songs by `artist`. The caller is expected to pass a query that
    /// already went through [`normalize_query`].
    ///
    /// An empty `Vec` means the catalog had no matches, which is not an error.
    pub fn search(&self, artist: &str) -> Result<Vec<Track>, SearchError> {
        let url = self.search_url();
        let limit = self.settings.limit.to_string();

        debug!(%url, artist, limit = self.settings.limit, "sending catalog search");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("term", artist),
                ("entity", self.settings.entity.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.text()?;
        let tracks = parse_tracks(&body, self.settings.artwork_size)?;
        info!(artist, count = tracks.len(), "catalog search finished");
        Ok(tracks)
    }

    pub(super) fn search_url(&self) -> String {
        format!("{}/search", self.settings.base_url.trim_end_matches('/'))
    }
}

/// Trim a raw query; `None` means there is nothing to search for.
pub fn normalize_query(raw: &str) -> Option<String> {
    let q = raw.trim();
    if q.is_empty() {
        None
    } else {
        Some(q.to_string())
    }
}

/// Decode a search payload into tracks, preserving response order.
pub fn parse_tracks(body: &str, artwork_size: u32) -> Result<Vec<Track>, SearchError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    if response.result_count != response.results.len() {
        debug!(
            declared = response.result_count,
            actual = response.results.len(),
            "resultCount disagrees with results"
        );
    }

    Ok(response
        .results
        .into_iter()
        .filter_map(|r| to_track(r, artwork_size))
        .collect())
}

fn to_track(result: SongResult, artwork_size: u32) -> Option<Track> {
    let Some(preview_url) = result.preview_url.filter(|u| !u.trim().is_empty()) else {
        debug!(track_id = result.track_id, "skipping result without a preview");
        return None;
    };

    Some(Track {
        id: result.track_id,
        title: result.track_name,
        artist: result.artist_name,
        cover_url: result
            .artwork_url_100
            .map(|u| upscale_artwork(&u, artwork_size))
            .unwrap_or_default(),
        preview_url,
        duration_secs: result.track_time_millis.unwrap_or(0) / 1000,
    })
}

/// Swap the 100px size token for `size`px.
pub(super) fn upscale_artwork(url: &str, size: u32) -> String {
    url.replace(SMALL_ARTWORK_TOKEN, &format!("{size}x{size}bb"))
}
