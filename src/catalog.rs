//! Catalog search: the iTunes Search API client and its track model.
//!
//! `client` performs the HTTP request and maps the payload, `dispatch` runs
//! searches on worker threads and tags each one with a sequence number so the
//! UI can ignore responses that were overtaken by a newer search.

mod client;
mod dispatch;
mod dto;
mod model;

pub use client::{CatalogClient, SearchError, normalize_query};
pub use dispatch::{SearchReply, SearchSequence, spawn_search};
pub use model::Track;

#[cfg(test)]
mod tests;
