//! HTTP trigger surface.
//!
//! `/brief` is routed with `any` so the method check happens in the handler
//! and a wrong method gets the JSON 405 body before any work starts.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::engine::BriefRunner;

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<BriefRunner>,
}

impl AppState {
    pub fn new(runner: BriefRunner) -> Self {
        Self {
            runner: Arc::new(runner),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/brief", any(trigger))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct TriggerOk {
    success: bool,
    message: String,
    timestamp: String,
}

#[derive(Serialize)]
struct TriggerErr {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

async fn trigger(method: Method, State(state): State<AppState>) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            Json(TriggerErr {
                error: "Method not allowed",
                details: None,
            }),
        )
            .into_response();
    }

    match state.runner.run(Utc::now()).await {
        Ok(report) => {
            let message = if report.used_fallback {
                "Fallback brief sent (summarizer returned no content)"
            } else {
                "Daily brief generated and sent"
            };
            Json(TriggerOk {
                success: true,
                message: message.to_string(),
                timestamp: report.finished_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            })
            .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(TriggerErr {
                error: "Failed to generate or deliver brief",
                details: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}
