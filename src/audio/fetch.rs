use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::types::PlaybackError;

const USER_AGENT: &str = concat!("vibetunes/", env!("CARGO_PKG_VERSION"));

/// Downloads preview clips into memory. Previews are small (~1 MB), so the
/// whole body is buffered and decoded from a cursor.
#[derive(Clone)]
pub(super) struct PreviewFetcher {
    http: Client,
}

impl PreviewFetcher {
    pub(super) fn new(timeout: Duration) -> Result<Self, PlaybackError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    pub(super) fn fetch(&self, url: &str) -> Result<Arc<[u8]>, PlaybackError> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlaybackError::Status(status));
        }

        let bytes = response.bytes()?;
        debug!(url, len = bytes.len(), "fetched preview");
        Ok(Arc::from(bytes.as_ref()))
    }
}
