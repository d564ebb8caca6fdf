//! Integration tests using mock HTTP server
//!
//! Tests the full flow: mock news API → fetcher → pagination controller →
//! feed entries, and the HTTP server on top of it.

use headline_feed::cli::{router, ServerState, SharedFetcher};
use headline_feed::config::AppConfig;
use headline_feed::feed::{ArticleLayout, HeadlineFeed};
use headline_feed::fetch::NewsApiFetcher;
use headline_feed::pagination::{LoadOutcome, LoadStatus, PaginationController};
use headline_feed::{DateConverter, ErrorKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article(title: &str, image: Option<&str>) -> Value {
    json!({
        "source": {"id": null, "name": "Example News"},
        "author": null,
        "title": title,
        "description": null,
        "url": format!("https://example.com/{title}"),
        "urlToImage": image,
        "publishedAt": "2021-08-01T03:15:00Z",
        "content": null
    })
}

async fn mount_page(server: &MockServer, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig::default()
        .with_base_url(server.uri())
        .with_api_key("integration-key")
}

// ============================================================================
// Controller over the live fetcher
// ============================================================================

#[tokio::test]
async fn test_pages_accumulate_through_api() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        json!({
            "status": "ok",
            "totalResults": 3,
            "articles": [article("A", Some("https://img/a.jpg")), article("B", None)]
        }),
    )
    .await;
    mount_page(
        &server,
        2,
        json!({"status": "ok", "totalResults": 3, "articles": [article("C", None)]}),
    )
    .await;

    let fetcher = NewsApiFetcher::from_config(&config_for(&server)).unwrap();
    let feed = HeadlineFeed::new(
        PaginationController::new("general", fetcher),
        DateConverter::default(),
    );

    assert_eq!(
        feed.load_more().await,
        LoadOutcome::Appended { cursor: 1, count: 2 }
    );
    assert_eq!(
        feed.load_more().await,
        LoadOutcome::Appended { cursor: 2, count: 1 }
    );
    assert!(!feed.controller().has_more());

    let entries = feed.entries();
    let titles: Vec<&str> = entries.iter().map(|e| e.article.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    assert_eq!(entries[0].layout, ArticleLayout::Large);
    assert_eq!(entries[1].layout, ArticleLayout::Medium);
    assert_eq!(entries[2].article.published_at, "2021-08-01 12:15:00");
}

#[tokio::test]
async fn test_api_error_then_retry() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        json!({"status": "ok", "totalResults": 10, "articles": [article("A", None)]}),
    )
    .await;

    // page 2 is rate limited once, then succeeds
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "status": "error",
            "code": "rateLimited",
            "message": "rate limited"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        2,
        json!({"status": "ok", "totalResults": 10, "articles": [article("B", None)]}),
    )
    .await;

    let fetcher = NewsApiFetcher::from_config(&config_for(&server)).unwrap();
    let controller = PaginationController::new("general", fetcher);

    controller.load_next().await;
    let outcome = controller.load_next().await;

    match &outcome {
        LoadOutcome::Failed(err) => {
            assert_eq!(err.kind, ErrorKind::Api);
            assert_eq!(err.message, "rate limited");
        }
        other => panic!("Expected Failed, got {other:?}"),
    }
    assert!(matches!(controller.status(), LoadStatus::Error(_)));
    assert_eq!(controller.cursor(), 2);
    assert_eq!(controller.len(), 1);

    assert_eq!(
        controller.load_next().await,
        LoadOutcome::Appended { cursor: 2, count: 1 }
    );
    assert_eq!(controller.len(), 2);
}

#[tokio::test]
async fn test_unreachable_api_is_transport_error() {
    // Nothing listens on the discard port
    let config = AppConfig::default()
        .with_base_url("http://127.0.0.1:9/")
        .with_api_key("k");
    let fetcher = NewsApiFetcher::from_config(&config).unwrap();
    let controller = PaginationController::new("general", fetcher);

    match controller.load_next().await {
        LoadOutcome::Failed(err) => assert_eq!(err.kind, ErrorKind::Transport),
        other => panic!("Expected Failed, got {other:?}"),
    }
    assert_eq!(controller.cursor(), 1);
}

// ============================================================================
// HTTP server
// ============================================================================

async fn spawn_server(upstream: &MockServer) -> String {
    let fetcher: SharedFetcher =
        Arc::new(NewsApiFetcher::from_config(&config_for(upstream)).unwrap());
    let app = router(ServerState::new(fetcher, DateConverter::default()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_server_health_and_categories() {
    let upstream = MockServer::start().await;
    let base = spawn_server(&upstream).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({"status": "ok"}));

    let categories: Value = client
        .get(format!("{base}/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(categories["data"]["categories"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_server_feed_lifecycle() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(header("X-Api-Key", "integration-key"))
        .and(query_param("category", "sports"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 20,
            "articles": [article("Goal", Some("https://img/goal.jpg")), article("Match", None)]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let base = spawn_server(&upstream).await;
    let client = reqwest::Client::new();

    let empty: Value = client
        .get(format!("{base}/feed/sports"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(empty["data"]["cursor"], 1);
    assert_eq!(empty["data"]["status"], json!({"state": "idle"}));

    let more: Value = client
        .post(format!("{base}/feed/sports/more"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        more["data"]["outcome"],
        json!({"outcome": "appended", "cursor": 1, "count": 2})
    );
    assert_eq!(more["data"]["feed"]["cursor"], 2);
    assert_eq!(more["data"]["feed"]["entries"][0]["layout"], "large");
    assert_eq!(
        more["data"]["feed"]["entries"][0]["article"]["publishedAt"],
        "2021-08-01 12:15:00"
    );

    let key: Value = client
        .get(format!("{base}/feed/sports/refresh-key?anchor=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(key["data"]["refresh_key"], 1);

    // other categories keep their own cursor
    let general: Value = client
        .get(format!("{base}/feed/general"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(general["data"]["cursor"], 1);

    // invalidating rewinds the cursor to the anchor's page and clears entries
    let reset: Value = client
        .post(format!("{base}/feed/sports/invalidate?anchor=1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reset["data"]["cursor"], 1);

    let after: Value = client
        .get(format!("{base}/feed/sports"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["data"]["cursor"], 1);
    assert_eq!(after["data"]["entries"], json!([]));
}

#[tokio::test]
async fn test_server_unknown_category() {
    let upstream = MockServer::start().await;
    let base = spawn_server(&upstream).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/feed/weather"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}
