//! Common types used throughout headline-feed
//!
//! This module contains the wire model of the headlines API (articles and
//! the response envelope) and small enums shared across modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Articles
// ============================================================================

/// Publisher of an article
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    /// Publisher identifier, absent for many sources
    #[serde(default)]
    pub id: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// A single headline as delivered by the API
///
/// Articles carry no unique identifier; their identity is their position in
/// the feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// ISO-8601 UTC timestamp, e.g. `2021-08-01T03:15:00Z`
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl Article {
    /// Whether the article has a usable (non-blank) image URL
    pub fn has_image(&self) -> bool {
        self.url_to_image
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

// ============================================================================
// Response Envelope
// ============================================================================

/// Status field of a headlines response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
    #[serde(other)]
    Unknown,
}

impl ResponseStatus {
    /// Check if the status is "ok"
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Response body of the `top-headlines` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl HeadlinesResponse {
    /// Build a successful response
    pub fn ok(articles: Vec<Article>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            code: None,
            message: None,
            total_results: articles.len() as u32,
            articles,
        }
    }

    /// Build an API-level error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            code: None,
            message: Some(message.into()),
            total_results: 0,
            articles: Vec::new(),
        }
    }

    /// Set the total result count
    #[must_use]
    pub fn with_total(mut self, total: u32) -> Self {
        self.total_results = total;
        self
    }

    /// Human-readable reason for a non-"ok" response
    pub fn error_message(&self) -> String {
        match (&self.message, &self.code) {
            (Some(message), _) => message.clone(),
            (None, Some(code)) => code.clone(),
            (None, None) => format!("API returned status {:?}", self.status),
        }
    }

    /// Convert into the article list, or an API error if the status is not "ok"
    pub fn into_articles(self) -> Result<Vec<Article>> {
        if self.status.is_ok() {
            Ok(self.articles)
        } else {
            let message = self.error_message();
            Err(Error::api(self.code, message))
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Headline categories supported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Business,
    Entertainment,
    #[default]
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Query-string value for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| Error::invalid_value("category", format!("unknown category '{s}'")))
    }
}
