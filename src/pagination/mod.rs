//! Pagination module
//!
//! A [`PaginationController`] pages through one category with an integer
//! cursor.
//!
//! # Overview
//!
//! - The cursor starts at 1 and only moves forward, by one per loaded page.
//! - At most one fetch is in flight per controller; extra `load_next` calls
//!   are dropped, not queued.
//! - A failed fetch (transport or API-level) leaves the cursor and items
//!   untouched, so the next call retries the same page.
//! - An empty page is a valid last page: it still advances the cursor.

mod controller;
mod types;

pub use controller::PaginationController;
pub use types::{
    Cursor, LoadError, LoadOutcome, LoadStatus, Page, PagingState, INITIAL_CURSOR,
};
