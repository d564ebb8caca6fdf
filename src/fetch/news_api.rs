//! Fetcher for the newsapi.org `top-headlines` endpoint

use super::PageFetcher;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::{HeadlinesResponse, ResponseStatus};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Endpoint path relative to the base URL
pub const TOP_HEADLINES_PATH: &str = "top-headlines";

/// Fetches headline pages over HTTP
#[derive(Debug, Clone)]
pub struct NewsApiFetcher {
    client: HttpClient,
    country: String,
    page_size: u32,
}

impl NewsApiFetcher {
    /// Create a fetcher on top of an already-configured client
    pub fn new(client: HttpClient, country: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            country: country.into(),
            page_size,
        }
    }

    /// Build the HTTP client and fetcher from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_config()?)?;
        Ok(Self::new(client, &config.country, config.page_size))
    }

    /// Country code sent with every request
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Page size sent with every request
    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

#[async_trait]
impl PageFetcher for NewsApiFetcher {
    async fn fetch(&self, category: &str, page: u32) -> Result<HeadlinesResponse> {
        let request = RequestConfig::new()
            .query("country", &self.country)
            .query("category", category)
            .query("pageSize", self.page_size)
            .query("page", page);

        debug!(category, page, "Fetching headlines page");

        match self
            .client
            .get_json_with_config::<HeadlinesResponse>(TOP_HEADLINES_PATH, request)
            .await
        {
            Ok(response) => Ok(response),
            // The API reports key, quota and parameter problems as 4xx/5xx
            // with a regular error envelope; hand those back as responses.
            Err(Error::HttpStatus { status, body }) => match parse_error_body(&body) {
                Some(response) => {
                    warn!(status, message = %response.error_message(), "API rejected request");
                    Ok(response)
                }
                None => Err(Error::HttpStatus { status, body }),
            },
            Err(e) => Err(e),
        }
    }
}

/// Parse an error envelope out of a failed response body
fn parse_error_body(body: &str) -> Option<HeadlinesResponse> {
    serde_json::from_str::<HeadlinesResponse>(body)
        .ok()
        .filter(|response| response.status == ResponseStatus::Error)
}
