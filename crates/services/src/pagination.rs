//! Pagination control.
//!
//! Owns the page cursor, the filter context and the loaded entries. Loads
//! are a two-phase protocol: `begin_load` stamps a ticket with the filter
//! key it was issued under, `complete_load`/`fail_load` resolve it. The
//! stamp is compared against the current key at resolution time, so a
//! response that lands after a filter change is discarded instead of
//! applied.

use domains::models::{ActivityId, FeedEntry, OrgId, SubcategoryId};
use tracing::debug;

/// The (organization, subcategory) pair scoping a loaded page of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterKey {
    pub org: OrgId,
    pub subcategory: Option<SubcategoryId>,
}

/// Receipt for one in-flight page load.
#[derive(Debug)]
pub struct LoadTicket {
    key: FilterKey,
    page: u32,
}

impl LoadTicket {
    pub fn key(&self) -> FilterKey {
        self.key
    }

    pub fn page(&self) -> u32 {
        self.page
    }
}

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// The filter key changed while the load was in flight; the response
    /// was dropped and no state was touched.
    Superseded,
}

pub struct PaginationController {
    key: Option<FilterKey>,
    page: u32,
    has_more: bool,
    entries: Vec<FeedEntry>,
    in_flight: Option<FilterKey>,
}

impl PaginationController {
    pub fn new() -> Self {
        Self {
            key: None,
            page: 1,
            has_more: true,
            entries: Vec::new(),
            in_flight: None,
        }
    }

    /// Switches the filter context. Setting the current key again is a
    /// no-op; any other key atomically clears the entries, resets the
    /// cursor and forgets the in-flight load, all before the next fetch is
    /// issued. Returns whether the key actually changed.
    pub fn set_filter(&mut self, key: Option<FilterKey>) -> bool {
        if self.key == key {
            return false;
        }
        debug!(?key, "filter changed, resetting pagination");
        self.key = key;
        self.page = 1;
        self.has_more = true;
        self.entries.clear();
        self.in_flight = None;
        true
    }

    /// Starts a load for `page` under the current filter key. Returns
    /// `None` when no filter is set, or when a load is already in flight
    /// (the request coalesces into the running one).
    pub fn begin_load(&mut self, page: u32) -> Option<LoadTicket> {
        let key = self.key?;
        if self.in_flight.is_some() {
            debug!(page, "load already in flight, coalescing");
            return None;
        }
        self.in_flight = Some(key);
        Some(LoadTicket { key, page })
    }

    /// Applies a successful load: page 1 replaces the entries, later pages
    /// append, `has_more` is recomputed from the response's page count. A
    /// ticket stamped with a superseded key is discarded untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        entries: Vec<FeedEntry>,
        page_count: u32,
    ) -> LoadOutcome {
        if Some(ticket.key) != self.key {
            debug!(page = ticket.page, "discarding load for superseded filter");
            return LoadOutcome::Superseded;
        }
        self.in_flight = None;
        if ticket.page <= 1 {
            self.entries = entries;
        } else {
            self.entries.extend(entries);
        }
        self.page = ticket.page.max(1);
        self.has_more = ticket.page < page_count;
        LoadOutcome::Applied
    }

    /// A failed load leaves entries, cursor and `has_more` exactly as they
    /// were; only the in-flight marker is released so a retry can start.
    pub fn fail_load(&mut self, ticket: LoadTicket) {
        if Some(ticket.key) == self.key {
            self.in_flight = None;
        }
    }

    /// Inserts a locally composed entry at the head of the feed.
    pub fn prepend(&mut self, entry: FeedEntry) {
        self.entries.insert(0, entry);
    }

    pub fn filter(&self) -> Option<FilterKey> {
        self.key
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn entry_mut(&mut self, id: ActivityId) -> Option<&mut FeedEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new()
    }
}
