//! Application model types: `App`, `Focus` and `ListNotice`.
//!
//! `App` wraps the playback controller with the view state the screen needs:
//! the search box, the list cursor and the notice that replaces the list.

use std::time::Instant;

use tracing::{debug, info};

use crate::catalog::{SearchReply, SearchSequence, normalize_query};
use crate::player::{Controller, PlaybackPort, SourceId};

/// Which region receives typed characters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    List,
    Search,
}

/// Message shown in place of the track list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListNotice {
    Prompt,
    Searching,
    NoResults,
    Failed,
}

impl ListNotice {
    pub fn message(self) -> &'static str {
        match self {
            Self::Prompt => "Enter an artist name to search",
            Self::Searching => "Searching...",
            Self::NoResults => "No tracks found for this artist",
            Self::Failed => "Error loading tracks",
        }
    }
}

/// The main application model.
pub struct App<P: PlaybackPort> {
    pub controller: Controller<P>,
    pub selected: usize,
    pub focus: Focus,
    pub query: String,

    notice: Option<ListNotice>,
    searches: SearchSequence,
    pending_search: Option<String>,
}

impl<P: PlaybackPort> App<P> {
    pub fn new(controller: Controller<P>) -> Self {
        Self {
            controller,
            selected: 0,
            focus: Focus::Search,
            query: String::new(),
            notice: Some(ListNotice::Prompt),
            searches: SearchSequence::default(),
            pending_search: None,
        }
    }

    pub fn notice(&self) -> Option<ListNotice> {
        self.notice
    }

    /// Term of the search still in flight, if any.
    pub fn pending_search(&self) -> Option<&str> {
        self.pending_search.as_deref()
    }

    /// Whether the track list (rather than a notice) occupies the list region.
    pub fn list_visible(&self) -> bool {
        self.notice.is_none() && self.controller.has_tracks()
    }

    pub fn focus_search(&mut self) {
        self.focus = Focus::Search;
    }

    pub fn leave_search(&mut self) {
        self.focus = Focus::List;
    }

    /// Hide the notice and show the track list again, if there is one.
    pub fn dismiss_notice(&mut self) {
        if self.controller.has_tracks() {
            self.notice = None;
        }
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
    }

    /// Submit the search box.
    ///
    /// Returns the sequence number and term to dispatch, or `None` when the
    /// query is blank (the prompt notice is shown instead).
    pub fn submit_search(&mut self) -> Option<(u64, String)> {
        let Some(term) = normalize_query(&self.query) else {
            debug!("empty search submitted");
            self.notice = Some(ListNotice::Prompt);
            return None;
        };

        let seq = self.searches.issue();
        self.pending_search = Some(term.clone());
        self.focus = Focus::List;
        if !self.controller.has_tracks() || self.notice.is_some() {
            self.notice = Some(ListNotice::Searching);
        }
        Some((seq, term))
    }

    /// Apply a finished search. Replies to superseded searches are dropped;
    /// returns whether the reply was applied.
    pub fn apply_search(&mut self, reply: SearchReply) -> bool {
        if !self.searches.is_current(reply.seq) {
            debug!(
                seq = reply.seq,
                latest = self.searches.latest(),
                term = %reply.term,
                "dropping stale search reply"
            );
            return false;
        }
        self.pending_search = None;

        match reply.result {
            Ok(tracks) if tracks.is_empty() => {
                info!(term = %reply.term, "search returned no tracks");
                self.controller.set_tracks(Vec::new());
                self.selected = 0;
                self.notice = Some(ListNotice::NoResults);
            }
            Ok(tracks) => {
                info!(term = %reply.term, count = tracks.len(), "search finished");
                self.controller.set_tracks(tracks);
                self.selected = 0;
                self.notice = None;
            }
            Err(_) => {
                // Details are logged by the worker; the list stays as it was.
                self.notice = Some(ListNotice::Failed);
            }
        }
        true
    }

    /// Move the cursor down, wrapping at the end.
    pub fn select_next(&mut self) {
        let n = self.controller.tracks().len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
        }
    }

    /// Move the cursor up, wrapping at the top.
    pub fn select_prev(&mut self) {
        let n = self.controller.tracks().len();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
    }

    /// Play the entry under the cursor.
    pub fn activate_selected(&mut self) {
        if self.list_visible() {
            self.controller.play_index(self.selected);
        }
    }

    /// A click on list entry `index`.
    pub fn click_row(&mut self, index: usize) {
        if !self.list_visible() || index >= self.controller.tracks().len() {
            return;
        }
        self.selected = index;
        self.controller.play_index(index);
    }

    pub fn toggle_playback(&mut self) {
        if self.controller.is_loaded() {
            self.controller.toggle();
        }
    }

    pub fn next_track(&mut self) {
        if self.controller.has_tracks() {
            self.controller.next();
            self.follow_current();
        }
    }

    pub fn prev_track(&mut self) {
        if self.controller.has_tracks() {
            self.controller.previous();
            self.follow_current();
        }
    }

    pub fn seek_fraction(&mut self, fraction: f64) {
        self.controller.seek(fraction);
    }

    /// Digit shortcut: `0` seeks to the start, `9` to 90%.
    pub fn seek_digit(&mut self, digit: u32) {
        if digit <= 9 {
            self.controller.seek(f64::from(digit) / 10.0);
        }
    }

    /// Run the progress tick if it is due.
    pub fn tick(&mut self, now: Instant) {
        if self.controller.tick_due(now) {
            let before = self.controller.current_index();
            self.controller.tick();
            if self.controller.current_index() != before {
                self.follow_current();
            }
        }
    }

    pub fn track_ended(&mut self, source: SourceId) {
        let before = self.controller.current_index();
        self.controller.track_ended(source);
        if self.controller.current_index() != before {
            self.follow_current();
        }
    }

    pub fn track_failed(&mut self, source: SourceId, reason: &str) {
        self.controller.track_failed(source, reason);
    }

    /// Put the cursor on the loaded track.
    fn follow_current(&mut self) {
        if let Some(i) = self.controller.current_index() {
            self.selected = i;
        }
    }
}
