//! # headline-feed
//!
//! A paginated news headline feed: fetch pages of top headlines, accumulate
//! them behind a cursor, convert publication dates, and present the result.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use headline_feed::config::AppConfig;
//! use headline_feed::fetch::NewsApiFetcher;
//! use headline_feed::pagination::PaginationController;
//!
//! #[tokio::main]
//! async fn main() -> headline_feed::Result<()> {
//!     let config = AppConfig::default().with_env();
//!     let fetcher = NewsApiFetcher::from_config(&config)?;
//!     let controller = PaginationController::new("general", fetcher);
//!
//!     controller.load_next().await;
//!     for article in controller.current_items() {
//!         println!("{}", article.title);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            Presentation (feed, cli, HTTP server)         │
//! │   entries()   on_scrolled()   refresh_key()   view()     │
//! └──────────────────────────────┬───────────────────────────┘
//!                                │ load_next()
//! ┌──────────────────────────────┴───────────────────────────┐
//! │                 PaginationController                     │
//! │   cursor · pages · status      single-flight, per category│
//! └──────────────────────────────┬───────────────────────────┘
//!                                │ fetch(category, page)
//! ┌──────────────────────────────┴───────────────────────────┐
//! │          PageFetcher → NewsApiFetcher → HttpClient        │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Article and response types
pub mod types;

/// Publication date conversion
pub mod datetime;

/// Application configuration
pub mod config;

/// HTTP client
pub mod http;

/// Page fetchers
pub mod fetch;

/// Cursor-driven pagination
pub mod pagination;

/// Feed presentation
pub mod feed;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use config::AppConfig;
pub use datetime::{to_local, DateConverter};
pub use feed::{ArticleLayout, FeedEntry, HeadlineFeed};
pub use fetch::{NewsApiFetcher, PageFetcher};
pub use pagination::{LoadOutcome, LoadStatus, PaginationController};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
