//! Background search execution.
//!
//! Searches run on short-lived worker threads so the event loop never blocks
//! on the network. Every search carries a sequence number; only the reply for
//! the most recently issued number is meant to be applied.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, warn};

use super::client::{CatalogClient, SearchError};
use super::model::Track;

/// Result of one background search.
#[derive(Debug)]
pub struct SearchReply {
    pub seq: u64,
    pub term: String,
    pub result: Result<Vec<Track>, SearchError>,
}

/// Monotonic sequence of issued searches.
#[derive(Debug, Default)]
pub struct SearchSequence {
    latest: u64,
}

impl SearchSequence {
    /// Issue the number for a new search. Earlier numbers become stale.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq != 0 && seq == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

/// Run `term` against the catalog on a worker thread and post the reply on `tx`.
pub fn spawn_search<E>(client: Arc<CatalogClient>, seq: u64, term: String, tx: Sender<E>)
where
    E: From<SearchReply> + Send + 'static,
{
    debug!(seq, %term, "dispatching search");
    thread::spawn(move || {
        let result = client.search(&term);
        if let Err(e) = &result {
            warn!(seq, %term, error = %e, "search failed");
        }
        // The receiver is gone when the app is shutting down.
        let _ = tx.send(E::from(SearchReply { seq, term, result }));
    });
}
