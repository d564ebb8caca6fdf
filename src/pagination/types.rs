//! Pagination types
//!
//! Defines the cursor, page, status and snapshot types shared by the
//! controller and its consumers.

use crate::error::{Error, ErrorKind};
use crate::types::Article;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page number driving the next fetch (1-based)
pub type Cursor = u32;

/// Cursor of the first page
pub const INITIAL_CURSOR: Cursor = 1;

// ============================================================================
// Page
// ============================================================================

/// One successfully loaded page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Articles in arrival order
    pub items: Vec<Article>,
    /// Cursor this page was requested with
    pub cursor: Cursor,
    /// Cursor of the page before this one
    pub prev_cursor: Option<Cursor>,
    /// Cursor of the page after this one, if more are expected
    pub next_cursor: Option<Cursor>,
}

impl Page {
    /// Create a page with the usual neighbours (`cursor - 1`, `cursor + 1`)
    pub fn new(cursor: Cursor, items: Vec<Article>) -> Self {
        Self {
            items,
            cursor,
            prev_cursor: cursor.checked_sub(1).filter(|c| *c >= INITIAL_CURSOR),
            next_cursor: cursor.checked_add(1),
        }
    }

    /// Mark this page as the last one
    #[must_use]
    pub fn last(mut self) -> Self {
        self.next_cursor = None;
        self
    }

    /// Number of items on the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor that reloads a window around this page
    pub fn refresh_key(&self) -> Option<Cursor> {
        self.prev_cursor
            .and_then(|prev| prev.checked_add(1))
            .or_else(|| self.next_cursor.and_then(|next| next.checked_sub(1)))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Why the last load failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadError {
    /// Transport or API
    pub kind: ErrorKind,
    /// Human-readable reason
    pub message: String,
}

impl LoadError {
    /// Create a load error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&Error> for LoadError {
    fn from(error: &Error) -> Self {
        Self::new(error.kind(), error.to_string())
    }
}

impl From<Error> for LoadError {
    fn from(error: Error) -> Self {
        Self::from(&error)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Status of the most recent load
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch appended a page
    Success,
    /// The last fetch failed; the same cursor can be retried
    Error(LoadError),
}

impl LoadStatus {
    /// Check if a fetch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// What a call to `load_next` did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// A page was appended
    Appended {
        /// Cursor the page was fetched with
        cursor: Cursor,
        /// Number of items on the page
        count: usize,
    },
    /// The fetch failed; nothing changed but the status
    Failed(LoadError),
    /// Another fetch was already in flight
    Skipped,
}

// ============================================================================
// Paging State
// ============================================================================

/// Consistent view of a controller: status, cursor and loaded pages
/// always change together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingState {
    /// Status of the most recent load
    pub status: LoadStatus,
    /// Cursor the next load will use
    pub cursor: Cursor,
    /// Loaded pages in cursor order
    pub pages: Vec<Page>,
    /// Items on pages before the first loaded one, after a restart
    #[serde(default)]
    pub skipped: usize,
}

impl Default for PagingState {
    fn default() -> Self {
        Self::starting_at(INITIAL_CURSOR)
    }
}

impl PagingState {
    /// Empty state whose first load uses `cursor`
    pub fn starting_at(cursor: Cursor) -> Self {
        Self::restarting_at(cursor, 0)
    }

    /// Empty state resuming at `cursor` with `skipped` items already
    /// consumed by earlier pages
    pub fn restarting_at(cursor: Cursor, skipped: usize) -> Self {
        Self {
            status: LoadStatus::Idle,
            cursor,
            pages: Vec::new(),
            skipped,
        }
    }

    /// Total number of accumulated items
    pub fn len(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Whether nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Accumulated items, in page order
    pub fn items(&self) -> Vec<Article> {
        self.iter_items().cloned().collect()
    }

    /// Iterate accumulated items without cloning
    pub fn iter_items(&self) -> impl Iterator<Item = &Article> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    /// Whether another page is expected.
    ///
    /// True before the first load; afterwards follows the last page's
    /// next cursor.
    pub fn has_more(&self) -> bool {
        self.pages
            .last()
            .map_or(true, |page| page.next_cursor.is_some())
    }

    /// Page holding the item at `anchor`.
    ///
    /// Anchors past the end resolve to the last page. Empty pages hold no
    /// positions and are skipped unless every page is empty.
    pub fn closest_page(&self, anchor: usize) -> Option<&Page> {
        let mut start = 0;
        for page in &self.pages {
            let end = start + page.len();
            if anchor < end {
                return Some(page);
            }
            start = end;
        }
        self.pages.iter().rev().find(|p| !p.is_empty()).or(self.pages.last())
    }

    /// Cursor that reloads a consistent window around `anchor`
    pub fn refresh_key(&self, anchor: usize) -> Option<Cursor> {
        self.closest_page(anchor).and_then(Page::refresh_key)
    }
}
