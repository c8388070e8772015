// src/listings/mod.rs
//! Auxiliary Listing Fetcher (product launches).
//!
//! Window: `[now - window_hours, now]`, both bounds in UTC. Results are
//! ordered by descending score; ties keep the provider's order.

pub mod product_hunt;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use metrics::counter;

use crate::error::SourceError;

pub use product_hunt::ProductHunt;

pub const LISTINGS_UNAVAILABLE: &str = "Product launches unavailable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    pub tagline: String,
    pub url: String,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn ending_at(now: DateTime<Utc>, hours: i64) -> Self {
        Self {
            start: now - Duration::hours(hours),
            end: now,
        }
    }

    pub fn hours(&self) -> i64 {
        (self.end - self.start).num_hours()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingSummary {
    pub listings: Vec<Listing>,
}

impl ListingSummary {
    /// Sort by score (desc, stable) and keep the top `limit`.
    pub fn top(mut listings: Vec<Listing>, limit: usize) -> Self {
        listings.sort_by(|a, b| b.score.cmp(&a.score));
        listings.truncate(limit);
        Self { listings }
    }

    pub fn render(&self, window: &TimeWindow) -> String {
        if self.listings.is_empty() {
            return format!("No launches found in the last {} hours.", window.hours());
        }
        self.listings
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let tagline = l.tagline.trim();
                if tagline.is_empty() {
                    format!("{}. {} ({}) [{} votes]", i + 1, l.name, l.url, l.score)
                } else {
                    format!(
                        "{}. {} - {} ({}) [{} votes]",
                        i + 1,
                        l.name,
                        tagline,
                        l.url,
                        l.score
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn listings(&self, window: &TimeWindow, limit: usize)
        -> Result<Vec<Listing>, SourceError>;

    fn name(&self) -> &'static str;
}

pub struct ListingFetcher {
    source: Arc<dyn ListingSource>,
    limit: usize,
    window_hours: i64,
}

impl ListingFetcher {
    pub fn new(source: Arc<dyn ListingSource>, limit: usize, window_hours: i64) -> Self {
        Self {
            source,
            limit,
            window_hours,
        }
    }

    pub fn window(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::ending_at(now, self.window_hours)
    }

    pub async fn collect(&self, now: DateTime<Utc>) -> Result<ListingSummary, SourceError> {
        let window = self.window(now);
        let raw = self.source.listings(&window, self.limit).await?;
        Ok(ListingSummary::top(raw, self.limit))
    }

    /// Rendered listing, or the fixed placeholder on any failure.
    pub async fn fetch_listings(&self, now: DateTime<Utc>) -> String {
        match self.collect(now).await {
            Ok(summary) => summary.render(&self.window(now)),
            Err(e) => {
                tracing::warn!(error = %e, provider = self.source.name(), "listings unavailable");
                counter!("brief_source_errors_total", "source" => "listings").increment(1);
                LISTINGS_UNAVAILABLE.to_string()
            }
        }
    }
}
