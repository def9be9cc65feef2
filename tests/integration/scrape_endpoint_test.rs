// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_server, StubCrawler};
use axum::http::StatusCode;
use lp_archive_scraper::domain::models::extraction::{ExtractionConfig, RawExtraction};
use lp_archive_scraper::engines::traits::CrawlOutcome;
use serde_json::json;

#[tokio::test]
async fn test_scrape_returns_normalized_results() {
    let crawler = StubCrawler::returning(CrawlOutcome::succeeded(RawExtraction::Text(
        json!({
            "lps": [
                {"title": "Spring Sale", "thumbnail_url": "https://cdn/a.png", "lp_url": "https://a", "category": "beauty"},
                {"title": "", "lp_url": "https://b"},
                {"title": "no link"}
            ]
        })
        .to_string(),
    )));
    let server = create_test_server(crawler.clone());

    let response = server
        .post("/scrape/lp-archive")
        .json(&json!({
            "url": "https://rdlp.jp/lp-archive",
            "image_type": "pc",
            "use_llm": false
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<serde_json::Value>();
    assert_eq!(
        body,
        json!({
            "success": true,
            "results": [
                {"title": "Spring Sale", "thumbnail_url": "https://cdn/a.png", "lp_url": "https://a", "category": "beauty"},
                {"title": "タイトルなし", "thumbnail_url": "", "lp_url": "https://b", "category": null}
            ],
            "error": null
        })
    );

    let calls = crawler.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "https://rdlp.jp/lp-archive?image_type=pc");
    assert!(matches!(calls[0].1.extraction, ExtractionConfig::Selector(_)));
}

#[tokio::test]
async fn test_scrape_uses_llm_with_legacy_key_field() {
    let crawler = StubCrawler::returning(CrawlOutcome::succeeded(RawExtraction::Sequence(
        vec![],
    )));
    let server = create_test_server(crawler.clone());

    let response = server
        .post("/scrape/lp-archive")
        .json(&json!({
            "url": "https://rdlp.jp/lp-archive",
            "gemini_api_key": "secret-key",
            "limit": 4
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["results"], json!([]));

    let calls = crawler.calls();
    match &calls[0].1.extraction {
        ExtractionConfig::Llm(llm) => {
            assert_eq!(llm.api_token, "secret-key");
            assert!(llm.instruction.contains("at most 4 items"));
        }
        other => panic!("expected llm extraction, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scrape_respects_limit() {
    let lps: Vec<_> = (0..15)
        .map(|i| json!({"title": format!("LP {i}"), "lp_url": format!("https://lp/{i}")}))
        .collect();
    let crawler = StubCrawler::returning(CrawlOutcome::succeeded(RawExtraction::from(
        json!({ "lps": lps }),
    )));
    let server = create_test_server(crawler);

    let body = server
        .post("/scrape/lp-archive")
        .json(&json!({"url": "https://rdlp.jp/lp-archive"}))
        .await
        .json::<serde_json::Value>();

    assert_eq!(body["success"], true);
    assert_eq!(body["results"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_collaborator_failure_is_200_with_error() {
    let crawler = StubCrawler::returning(CrawlOutcome::failed("blocked"));
    let server = create_test_server(crawler);

    let response = server
        .post("/scrape/lp-archive")
        .json(&json!({"url": "https://rdlp.jp/lp-archive", "use_llm": false}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"success": false, "results": [], "error": "blocked"})
    );
}

#[tokio::test]
async fn test_missing_browser_is_reported() {
    let server = create_test_server(StubCrawler::unavailable("no chrome binary"));

    let response = server
        .post("/scrape/lp-archive")
        .json(&json!({"url": "https://rdlp.jp/lp-archive"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "chromium is not installed: no chrome binary");
}

#[tokio::test]
async fn test_invalid_limit_is_handled_failure() {
    let crawler = StubCrawler::returning(CrawlOutcome::failed("unused"));
    let server = create_test_server(crawler.clone());

    let response = server
        .post("/scrape/lp-archive")
        .json(&json!({"url": "https://rdlp.jp/lp-archive", "limit": 0}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request"));
    assert!(crawler.calls().is_empty());
}

#[tokio::test]
async fn test_body_without_url_is_rejected() {
    let crawler = StubCrawler::returning(CrawlOutcome::failed("unused"));
    let server = create_test_server(crawler.clone());

    let response = server
        .post("/scrape/lp-archive")
        .json(&json!({"limit": 3}))
        .await;

    assert!(response.status_code().is_client_error());
    assert!(crawler.calls().is_empty());
}
