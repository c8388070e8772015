// src/brief/mod.rs
//! Aggregator: fan out to every enabled collector, wait for all, build the prompt.
//!
//! Every collector settles with a value (empty section or placeholder) rather
//! than an error, so the join is unconditional.

pub mod prompt;
pub mod sections;

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::config::FeedsConfig;
use crate::ingest::{fetch_feed, FeedCollection};
use crate::listings::ListingFetcher;
use crate::market::MarketCollector;

pub use prompt::{render_prompt, BriefPrompt};
pub use sections::{Section, SectionSet};

/// Body used for a feed section that produced no items.
pub const NO_ITEMS: &str = "No items available.";

pub struct Aggregator {
    http: reqwest::Client,
    sections: SectionSet,
    feeds: FeedsConfig,
    market: MarketCollector,
    listings: ListingFetcher,
}

impl Aggregator {
    pub fn new(
        http: reqwest::Client,
        sections: SectionSet,
        feeds: FeedsConfig,
        market: MarketCollector,
        listings: ListingFetcher,
    ) -> Self {
        Self {
            http,
            sections,
            feeds,
            market,
            listings,
        }
    }

    pub fn sections(&self) -> &SectionSet {
        &self.sections
    }

    /// Collect every enabled section concurrently and render the prompt.
    pub async fn build_prompt(&self, now: DateTime<Utc>) -> BriefPrompt {
        let feed_futs = self.sections.feeds().filter_map(|section| {
            self.feeds.url_for(section).map(|url| async move {
                (section, fetch_feed(&self.http, url).await)
            })
        });

        let market_fut = async {
            if self.sections.contains(Section::Markets) {
                Some(self.market.fetch_market_snapshot().await)
            } else {
                None
            }
        };

        let listings_fut = async {
            if self.sections.contains(Section::Launches) {
                Some(self.listings.fetch_listings(now).await)
            } else {
                None
            }
        };

        let (feeds, mut market, mut listings) =
            tokio::join!(join_all(feed_futs), market_fut, listings_fut);

        let mut bodies: Vec<(Section, String)> = Vec::with_capacity(self.sections.len());
        for section in self.sections.iter() {
            let body = match section {
                Section::Markets => market.take(),
                Section::Launches => listings.take(),
                feed_section => feeds
                    .iter()
                    .find(|(s, _)| *s == feed_section)
                    .map(|(_, coll)| self.render_feed(coll)),
            };
            if let Some(body) = body {
                bodies.push((section, body));
            }
        }

        tracing::info!(
            sections = bodies.len(),
            feeds = feeds.len(),
            "brief prompt assembled"
        );
        render_prompt(now.date_naive(), &bodies)
    }

    fn render_feed(&self, coll: &FeedCollection) -> String {
        if coll.is_empty() {
            NO_ITEMS.to_string()
        } else {
            coll.render_top(self.feeds.max_items)
        }
    }
}
