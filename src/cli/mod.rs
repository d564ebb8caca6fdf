//! CLI module
//!
//! Command-line interface for the headline feed.
//!
//! # Commands
//!
//! - `headlines` - Load pages of a category and print them
//! - `categories` - List categories
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{render_pretty, Runner};
pub use server::{router, serve, ServerState, SharedFetcher};
