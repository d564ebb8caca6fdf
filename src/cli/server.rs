//! HTTP server mode for REST access to headline feeds
//!
//! One feed (and so one pagination controller) per category, created on
//! first use and kept for the lifetime of the server.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::datetime::DateConverter;
use crate::error::{Error, Result};
use crate::feed::HeadlineFeed;
use crate::fetch::{NewsApiFetcher, PageFetcher};
use crate::pagination::PaginationController;
use crate::types::Category;

/// Fetcher shared by every category's controller
pub type SharedFetcher = Arc<dyn PageFetcher>;

/// State shared across handlers
pub struct ServerState {
    fetcher: SharedFetcher,
    converter: DateConverter,
    prefetch_distance: usize,
    feeds: Mutex<HashMap<Category, HeadlineFeed<SharedFetcher>>>,
}

impl ServerState {
    /// Create server state around a fetcher
    pub fn new(fetcher: SharedFetcher, converter: DateConverter) -> Self {
        Self {
            fetcher,
            converter,
            prefetch_distance: 5,
            feeds: Mutex::new(HashMap::new()),
        }
    }

    /// Build state from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher: SharedFetcher = Arc::new(NewsApiFetcher::from_config(config)?);
        let mut state = Self::new(fetcher, config.date_converter()?);
        state.prefetch_distance = config.prefetch_distance;
        Ok(state)
    }

    /// Feed for a category, created on first use
    pub async fn feed(&self, category: Category) -> HeadlineFeed<SharedFetcher> {
        let mut feeds = self.feeds.lock().await;
        feeds
            .entry(category)
            .or_insert_with(|| {
                tracing::debug!(%category, "Creating feed");
                HeadlineFeed::new(
                    PaginationController::new(category.as_str(), Arc::clone(&self.fetcher)),
                    self.converter,
                )
                .with_prefetch_distance(self.prefetch_distance)
            })
            .clone()
    }
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Query string carrying an anchor position
#[derive(Debug, Deserialize)]
struct AnchorQuery {
    anchor: Option<usize>,
}

/// Build the router
pub fn router(state: ServerState) -> Router {
    // Allow all origins so browser front ends can poll the feed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/categories", get(list_categories))
        .route("/feed/:category", get(get_feed))
        .route("/feed/:category/more", post(load_more))
        .route("/feed/:category/refresh-key", get(refresh_key))
        .route("/feed/:category/invalidate", post(invalidate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(config: AppConfig, port: u16) -> Result<()> {
    let state = ServerState::from_config(&config)?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

fn parse_category(name: &str) -> std::result::Result<Category, Response> {
    name.parse::<Category>().map_err(|e| {
        (StatusCode::NOT_FOUND, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
    })
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// List categories
async fn list_categories() -> impl IntoResponse {
    let names: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    Json(ApiResponse::success(json!({ "categories": names })))
}

/// Current feed for a category
async fn get_feed(State(state): State<Arc<ServerState>>, Path(name): Path<String>) -> Response {
    let category = match parse_category(&name) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let feed = state.feed(category).await;
    (StatusCode::OK, Json(ApiResponse::success(feed.view()))).into_response()
}

/// Load the next page of a category
async fn load_more(State(state): State<Arc<ServerState>>, Path(name): Path<String>) -> Response {
    let category = match parse_category(&name) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let feed = state.feed(category).await;
    let outcome = feed.load_more().await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "outcome": outcome,
            "feed": feed.view(),
        }))),
    )
        .into_response()
}

/// Refresh cursor for an anchor position
async fn refresh_key(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    Query(query): Query<AnchorQuery>,
) -> Response {
    let category = match parse_category(&name) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let anchor = query.anchor.unwrap_or(0);
    let feed = state.feed(category).await;
    let key = feed.controller().refresh_key(anchor);

    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "anchor": anchor,
            "refresh_key": key,
        }))),
    )
        .into_response()
}

/// Drop loaded pages and restart around an anchor
async fn invalidate(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    Query(query): Query<AnchorQuery>,
) -> Response {
    let category = match parse_category(&name) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let feed = state.feed(category).await;
    match feed.controller().invalidate(query.anchor) {
        Some(cursor) => (
            StatusCode::OK,
            Json(ApiResponse::success(json!({ "cursor": cursor }))),
        )
            .into_response(),
        None => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<()>::error("A page load is in flight")),
        )
            .into_response(),
    }
}
