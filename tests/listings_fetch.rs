// tests/listings_fetch.rs
//
// Auxiliary Listing Fetcher against a mocked Product Hunt GraphQL endpoint.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daily_brief::listings::{ListingFetcher, ProductHunt, LISTINGS_UNAVAILABLE};

fn fetcher(server: &MockServer, token: Option<&str>, limit: usize) -> ListingFetcher {
    ListingFetcher::new(
        Arc::new(ProductHunt::new(
            reqwest::Client::new(),
            format!("{}/graphql", server.uri()),
            token.map(str::to_string),
        )),
        limit,
        24,
    )
}

fn node(name: &str, votes: u32) -> serde_json::Value {
    json!({ "node": {
        "name": name,
        "tagline": format!("{name} does a thing"),
        "url": format!("https://ph.test/{}", name.to_lowercase()),
        "votesCount": votes
    }})
}

#[tokio::test]
async fn posts_window_with_bearer_and_ranks_by_votes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer ph-token"))
        .and(body_partial_json(json!({
            "variables": {
                "first": 3,
                "postedAfter": "2026-10-17T06:00:00Z",
                "postedBefore": "2026-10-18T06:00:00Z"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "posts": { "edges": [
                node("Lowly", 3), node("Topper", 250), node("Middle", 40), node("Extra", 1)
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2026, 10, 18, 6, 0, 0).unwrap();
    let out = fetcher(&server, Some("ph-token"), 3).fetch_listings(now).await;
    assert_eq!(
        out,
        "1. Topper - Topper does a thing (https://ph.test/topper) [250 votes]\n\
         2. Middle - Middle does a thing (https://ph.test/middle) [40 votes]\n\
         3. Lowly - Lowly does a thing (https://ph.test/lowly) [3 votes]"
    );
}

#[tokio::test]
async fn empty_window_says_so() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "posts": { "edges": [] } } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let out = fetcher(&server, Some("t"), 10).fetch_listings(Utc::now()).await;
    assert_eq!(out, "No launches found in the last 24 hours.");
}

#[tokio::test]
async fn graphql_errors_in_200_degrade_to_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "invalid_oauth_token" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = fetcher(&server, Some("bad"), 10).fetch_listings(Utc::now()).await;
    assert_eq!(out, LISTINGS_UNAVAILABLE);
}

#[tokio::test]
async fn http_failure_and_missing_token_degrade_to_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        fetcher(&server, Some("t"), 10).fetch_listings(Utc::now()).await,
        LISTINGS_UNAVAILABLE
    );
    // No token: fails before any request (the mock above stays at one call).
    assert_eq!(
        fetcher(&server, None, 10).fetch_listings(Utc::now()).await,
        LISTINGS_UNAVAILABLE
    );
}
