//! Pagination controller
//!
//! Owns the cursor for one category and turns `load_next` calls into
//! fetches. State lives in a single `watch` channel so that status, cursor
//! and pages are always published together.

use super::types::{
    Cursor, LoadError, LoadOutcome, LoadStatus, Page, PagingState, INITIAL_CURSOR,
};
use crate::fetch::PageFetcher;
use crate::types::Article;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Cursor-driven page loader for one category
pub struct PaginationController<F> {
    category: String,
    fetcher: F,
    state: watch::Sender<PagingState>,
}

impl<F: PageFetcher> PaginationController<F> {
    /// Create a controller whose first load requests page 1
    pub fn new(category: impl Into<String>, fetcher: F) -> Self {
        Self::starting_at(category, fetcher, INITIAL_CURSOR)
    }

    /// Create a controller whose first load requests `cursor`
    pub fn starting_at(category: impl Into<String>, fetcher: F, cursor: Cursor) -> Self {
        let (state, _) = watch::channel(PagingState::starting_at(cursor.max(INITIAL_CURSOR)));
        Self {
            category: category.into(),
            fetcher,
            state,
        }
    }

    /// Category this controller pages through
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch the page at the current cursor.
    ///
    /// Returns [`LoadOutcome::Skipped`] without fetching if another load is
    /// in flight. Failures never advance the cursor, so calling again
    /// retries the same page.
    pub async fn load_next(&self) -> LoadOutcome {
        let mut cursor = INITIAL_CURSOR;
        let started = self.state.send_if_modified(|state| {
            if state.status.is_loading() {
                return false;
            }
            state.status = LoadStatus::Loading;
            cursor = state.cursor;
            true
        });

        if !started {
            debug!(category = %self.category, "Load already in flight, skipping");
            return LoadOutcome::Skipped;
        }

        let mut guard = InFlight::new(&self.state);
        debug!(category = %self.category, cursor, "Loading page");

        let fetched = self.fetcher.fetch(&self.category, cursor).await.and_then(|response| {
            let total = response.total_results as usize;
            response.into_articles().map(|items| (items, total))
        });
        let outcome = match fetched {
            Ok((items, total)) => self.append(cursor, items, total),
            Err(e) => self.fail(cursor, LoadError::from(&e)),
        };

        guard.disarm();
        outcome
    }

    fn append(&self, cursor: Cursor, items: Vec<Article>, total: usize) -> LoadOutcome {
        let count = items.len();
        self.state.send_modify(|state| {
            let loaded = state.skipped + state.len() + count;
            let mut page = Page::new(cursor, items);
            if count == 0 || (total > 0 && loaded >= total) {
                page = page.last();
            }
            state.pages.push(page);
            state.cursor = cursor.saturating_add(1);
            state.status = LoadStatus::Success;
        });

        info!(category = %self.category, cursor, count, "Page loaded");
        LoadOutcome::Appended { cursor, count }
    }

    fn fail(&self, cursor: Cursor, error: LoadError) -> LoadOutcome {
        warn!(
            category = %self.category,
            cursor,
            kind = ?error.kind,
            "Page load failed: {}",
            error.message
        );
        self.state.send_modify(|state| {
            state.status = LoadStatus::Error(error.clone());
        });
        LoadOutcome::Failed(error)
    }

    /// Snapshot of all accumulated items
    pub fn current_items(&self) -> Vec<Article> {
        self.state.borrow().items()
    }

    /// Number of accumulated items
    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    /// Whether nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Status of the most recent load
    pub fn status(&self) -> LoadStatus {
        self.state.borrow().status.clone()
    }

    /// Cursor the next load will use
    pub fn cursor(&self) -> Cursor {
        self.state.borrow().cursor
    }

    /// Whether another page is expected
    pub fn has_more(&self) -> bool {
        self.state.borrow().has_more()
    }

    /// Consistent copy of status, cursor and pages
    pub fn snapshot(&self) -> PagingState {
        self.state.borrow().clone()
    }

    /// Observe every state change
    pub fn subscribe(&self) -> watch::Receiver<PagingState> {
        self.state.subscribe()
    }

    /// Cursor that reloads a consistent window around `anchor`
    pub fn refresh_key(&self, anchor: usize) -> Option<Cursor> {
        self.state.borrow().refresh_key(anchor)
    }

    /// Drop all pages and restart from the refresh key of `anchor`
    /// (page 1 without an anchor).
    ///
    /// This is the one place the cursor may move backwards. Items on the
    /// pages before the restart page stay counted, so the end of the feed is
    /// still detected against `totalResults`.
    ///
    /// Returns the new cursor, or `None` if a load is in flight.
    pub fn invalidate(&self, anchor: Option<usize>) -> Option<Cursor> {
        let mut restart = None;
        self.state.send_if_modified(|state| {
            if state.status.is_loading() {
                return false;
            }
            let cursor = anchor
                .and_then(|a| state.refresh_key(a))
                .unwrap_or(INITIAL_CURSOR);
            let skipped = if cursor == INITIAL_CURSOR {
                0
            } else {
                state.skipped
                    + state
                        .pages
                        .iter()
                        .filter(|page| page.cursor < cursor)
                        .map(Page::len)
                        .sum::<usize>()
            };
            *state = PagingState::restarting_at(cursor, skipped);
            restart = Some(cursor);
            true
        });

        if let Some(cursor) = restart {
            info!(category = %self.category, cursor, "Feed invalidated");
        }
        restart
    }
}

impl<F> std::fmt::Debug for PaginationController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PaginationController")
            .field("category", &self.category)
            .field("status", &state.status)
            .field("cursor", &state.cursor)
            .field("pages", &state.pages.len())
            .finish_non_exhaustive()
    }
}

/// Puts the status back to idle if a load is dropped before it completes,
/// so an abandoned request cannot wedge the controller.
struct InFlight<'a> {
    state: &'a watch::Sender<PagingState>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a watch::Sender<PagingState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_if_modified(|state| {
                if state.status.is_loading() {
                    state.status = LoadStatus::Idle;
                    true
                } else {
                    false
                }
            });
        }
    }
}
