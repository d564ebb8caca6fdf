//! Page fetchers
//!
//! A [`PageFetcher`] turns a `(category, page)` pair into one page of the
//! headlines response. The pagination controller only ever talks to this
//! trait, so any source (the live API, a fixture, a closure in a test) can
//! drive it.

mod news_api;

pub use news_api::{NewsApiFetcher, API_KEY_HEADER, TOP_HEADLINES_PATH};

use crate::error::Result;
use crate::types::HeadlinesResponse;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Source of headline pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page (1-based) of the given category.
    ///
    /// An `Ok` response may still carry a non-"ok" status; `Err` means no
    /// usable response was obtained.
    async fn fetch(&self, category: &str, page: u32) -> Result<HeadlinesResponse>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, category: &str, page: u32) -> Result<HeadlinesResponse> {
        (**self).fetch(category, page).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    async fn fetch(&self, category: &str, page: u32) -> Result<HeadlinesResponse> {
        (**self).fetch(category, page).await
    }
}

/// Adapter that lets a closure act as a [`PageFetcher`]
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap a closure returning a future as a [`PageFetcher`]
pub fn fetcher_fn<F, Fut>(f: F) -> FnFetcher<F>
where
    F: Fn(String, u32) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HeadlinesResponse>> + Send + 'static,
{
    FnFetcher { f }
}

#[async_trait]
impl<F, Fut> PageFetcher for FnFetcher<F>
where
    F: Fn(String, u32) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HeadlinesResponse>> + Send + 'static,
{
    async fn fetch(&self, category: &str, page: u32) -> Result<HeadlinesResponse> {
        (self.f)(category.to_string(), page).await
    }
}

impl<F> std::fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}
