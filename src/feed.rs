//! Feed presentation
//!
//! Maps the controller's accumulated articles into display entries and
//! decides when a scrolling consumer should ask for the next page.
//!
//! The first article is shown large when it has an image; everything else
//! uses the medium layout. Publication dates are converted to the
//! configured local offset.

use crate::datetime::DateConverter;
use crate::fetch::PageFetcher;
use crate::pagination::{LoadOutcome, PaginationController, PagingState};
use crate::types::Article;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Visual weight of a feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleLayout {
    /// Full-width image above the headline
    Large,
    /// Headline with a thumbnail beside it
    Medium,
}

/// Layout for the article at `index`
pub fn layout_for(index: usize, article: &Article) -> ArticleLayout {
    if index == 0 && article.has_image() {
        ArticleLayout::Large
    } else {
        ArticleLayout::Medium
    }
}

/// One displayable row of the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Position in the feed
    pub index: usize,
    pub layout: ArticleLayout,
    /// The article with `published_at` already converted for display
    pub article: Article,
}

/// Build display entries for a sequence of articles
pub fn build_feed<'a>(
    items: impl IntoIterator<Item = &'a Article>,
    converter: &DateConverter,
) -> Vec<FeedEntry> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, article)| {
            let mut article = article.clone();
            article.published_at = converter.to_local(&article.published_at);
            FeedEntry {
                index,
                layout: layout_for(index, &article),
                article,
            }
        })
        .collect()
}

/// Whether a consumer showing up to `last_visible` of `len` items is close
/// enough to the end to request another page.
pub fn should_load_more(last_visible: usize, len: usize, prefetch_distance: usize) -> bool {
    len == 0 || last_visible.saturating_add(prefetch_distance) >= len.saturating_sub(1)
}

/// Presentation-side wrapper around a controller
pub struct HeadlineFeed<F> {
    controller: Arc<PaginationController<F>>,
    converter: DateConverter,
    prefetch_distance: usize,
}

impl<F> Clone for HeadlineFeed<F> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            converter: self.converter,
            prefetch_distance: self.prefetch_distance,
        }
    }
}

impl<F: PageFetcher> HeadlineFeed<F> {
    /// Create a feed over a new controller
    pub fn new(controller: PaginationController<F>, converter: DateConverter) -> Self {
        Self::from_shared(Arc::new(controller), converter)
    }

    /// Create a feed over a shared controller
    pub fn from_shared(controller: Arc<PaginationController<F>>, converter: DateConverter) -> Self {
        Self {
            controller,
            converter,
            prefetch_distance: 5,
        }
    }

    /// Set how many items from the end scrolling triggers a load
    #[must_use]
    pub fn with_prefetch_distance(mut self, distance: usize) -> Self {
        self.prefetch_distance = distance;
        self
    }

    /// The underlying controller
    pub fn controller(&self) -> &Arc<PaginationController<F>> {
        &self.controller
    }

    /// Display entries for everything loaded so far
    pub fn entries(&self) -> Vec<FeedEntry> {
        let state = self.controller.snapshot();
        build_feed(state.iter_items(), &self.converter)
    }

    /// Entries together with the state they were built from
    pub fn view(&self) -> FeedView {
        let state = self.controller.snapshot();
        FeedView::new(&state, &self.converter)
    }

    /// Request the next page unconditionally
    pub async fn load_more(&self) -> LoadOutcome {
        self.controller.load_next().await
    }

    /// React to the consumer scrolling to `last_visible`.
    ///
    /// Loads the next page when near the end and more pages are expected;
    /// returns `None` when no load was attempted.
    pub async fn on_scrolled(&self, last_visible: usize) -> Option<LoadOutcome> {
        let (len, has_more) = {
            let state = self.controller.snapshot();
            (state.len(), state.has_more())
        };

        if !has_more || !should_load_more(last_visible, len, self.prefetch_distance) {
            return None;
        }

        debug!(last_visible, len, "Near end of feed, loading more");
        Some(self.controller.load_next().await)
    }
}

/// Serializable view of a feed at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedView {
    pub status: crate::pagination::LoadStatus,
    pub cursor: crate::pagination::Cursor,
    pub has_more: bool,
    pub entries: Vec<FeedEntry>,
}

impl FeedView {
    /// Build a view from a paging snapshot
    pub fn new(state: &PagingState, converter: &DateConverter) -> Self {
        Self {
            status: state.status.clone(),
            cursor: state.cursor,
            has_more: state.has_more(),
            entries: build_feed(state.iter_items(), converter),
        }
    }
}
