// src/listings/product_hunt.rs
//! Product Hunt GraphQL v2: top posts by votes inside a time window.

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Deserialize;
use serde_json::json;

use crate::config::secrets::{require, ENV_PRODUCT_HUNT};
use crate::error::SourceError;
use crate::listings::{Listing, ListingSource, TimeWindow};

const PROVIDER: &str = "product_hunt";

const TOP_POSTS_QUERY: &str = "query TopPosts($first: Int!, $postedAfter: DateTime!, $postedBefore: DateTime!) {
  posts(first: $first, order: VOTES, postedAfter: $postedAfter, postedBefore: $postedBefore) {
    edges { node { name tagline url votesCount } }
  }
}";

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

// GraphQL reports failures with HTTP 200 and an `errors` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PostsResponse {
    Errors { errors: Vec<GraphQlError> },
    Data { data: PostsData },
}

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: Connection,
}

#[derive(Debug, Deserialize)]
struct Connection {
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    name: String,
    #[serde(default)]
    tagline: String,
    url: String,
    votes_count: u32,
}

pub struct ProductHunt {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl ProductHunt {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token,
        }
    }
}

/// GraphQL request body for the window.
pub fn request_body(window: &TimeWindow, limit: usize) -> serde_json::Value {
    json!({
        "query": TOP_POSTS_QUERY,
        "variables": {
            "first": limit,
            "postedAfter": window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            "postedBefore": window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    })
}

pub fn parse_posts(body: &str) -> Result<Vec<Listing>, SourceError> {
    match serde_json::from_str::<PostsResponse>(body)? {
        PostsResponse::Errors { errors } => Err(SourceError::Provider {
            provider: PROVIDER,
            message: errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        }),
        PostsResponse::Data { data } => Ok(data
            .posts
            .edges
            .into_iter()
            .map(|e| Listing {
                name: e.node.name,
                tagline: e.node.tagline,
                url: e.node.url,
                score: e.node.votes_count,
            })
            .collect()),
    }
}

#[async_trait]
impl ListingSource for ProductHunt {
    async fn listings(
        &self,
        window: &TimeWindow,
        limit: usize,
    ) -> Result<Vec<Listing>, SourceError> {
        let token = require(&self.token, ENV_PRODUCT_HUNT, SourceError::MissingKey)?;
        let body = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&request_body(window, limit))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_posts(&body)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}
