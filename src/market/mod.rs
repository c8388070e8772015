// src/market/mod.rs
//! Market Data Collector.
//!
//! Canonical change definition: daily-close delta between the two most recent
//! observations of a daily series,
//! `change = latest - previous`, `change% = 100 * change / previous`,
//! rounded to 2 dp (midpoint away from zero).
//!
//! Failure policy is all-or-nothing: if any instrument fails the whole
//! snapshot is replaced by `MARKET_UNAVAILABLE`.

pub mod alpha_vantage;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::try_join_all;
use metrics::counter;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::InstrumentConfig;
use crate::error::SourceError;

pub use alpha_vantage::AlphaVantage;

pub const MARKET_UNAVAILABLE: &str = "Market data unavailable";

/// One dated close from a provider's daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub label: String,
    pub last_price: Decimal,
    pub change_percent: Decimal,
    pub as_of: NaiveDate,
}

impl Quote {
    /// `S&P 500 (SPY): $512.34 (+1.23%)`
    pub fn render(&self) -> String {
        let sign = if self.change_percent.is_sign_negative() {
            ""
        } else {
            "+"
        };
        format!(
            "{}: ${} ({}{}%)",
            self.label,
            two_dp(self.last_price),
            sign,
            self.change_percent
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarketSnapshot {
    pub quotes: Vec<Quote>,
}

impl MarketSnapshot {
    pub fn render(&self) -> String {
        self.quotes
            .iter()
            .map(Quote::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A provider of daily close series.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn daily_series(
        &self,
        instrument: &InstrumentConfig,
    ) -> Result<Vec<DailyClose>, SourceError>;

    fn name(&self) -> &'static str;
}

fn two_dp(v: Decimal) -> Decimal {
    let mut out = v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    out.rescale(2);
    if out.is_zero() {
        out.set_sign_positive(true);
    }
    out
}

/// Percent change from `previous` to `latest`, rounded to 2 dp.
pub fn percent_change(
    symbol: &str,
    previous: Decimal,
    latest: Decimal,
) -> Result<Decimal, SourceError> {
    if previous.is_zero() {
        return Err(SourceError::ZeroPreviousClose {
            symbol: symbol.to_string(),
        });
    }
    let overflow = || SourceError::Overflow {
        symbol: symbol.to_string(),
    };
    let pct = latest
        .checked_sub(previous)
        .and_then(|change| change.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|scaled| scaled.checked_div(previous))
        .ok_or_else(overflow)?;
    Ok(two_dp(pct))
}

/// Build a quote from an unordered series by picking the two latest dates.
pub fn quote_from_series(
    instrument: &InstrumentConfig,
    series: &[DailyClose],
) -> Result<Quote, SourceError> {
    let mut sorted: Vec<DailyClose> = series.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let (latest, previous) = match sorted.as_slice() {
        [latest, previous, ..] => (*latest, *previous),
        _ => {
            return Err(SourceError::InsufficientHistory {
                symbol: instrument.symbol.clone(),
                got: sorted.len(),
            })
        }
    };

    let change_percent = percent_change(&instrument.symbol, previous.close, latest.close)?;
    Ok(Quote {
        label: instrument.label.clone(),
        last_price: latest.close,
        change_percent,
        as_of: latest.date,
    })
}

pub struct MarketCollector {
    source: Arc<dyn QuoteSource>,
    instruments: Vec<InstrumentConfig>,
}

impl MarketCollector {
    pub fn new(source: Arc<dyn QuoteSource>, instruments: Vec<InstrumentConfig>) -> Self {
        Self {
            source,
            instruments,
        }
    }

    /// Fetch every instrument concurrently; the first failure fails the snapshot.
    pub async fn collect(&self) -> Result<MarketSnapshot, SourceError> {
        let quotes = try_join_all(self.instruments.iter().map(|inst| async move {
            let series = self.source.daily_series(inst).await?;
            quote_from_series(inst, &series)
        }))
        .await?;
        Ok(MarketSnapshot { quotes })
    }

    /// Rendered snapshot, or the fixed placeholder on any failure.
    pub async fn fetch_market_snapshot(&self) -> String {
        if self.instruments.is_empty() {
            tracing::warn!("no market instruments configured");
            return MARKET_UNAVAILABLE.to_string();
        }
        match self.collect().await {
            Ok(snap) => snap.render(),
            Err(e) => {
                tracing::warn!(error = %e, provider = self.source.name(), "market snapshot unavailable");
                counter!("brief_source_errors_total", "source" => "market").increment(1);
                MARKET_UNAVAILABLE.to_string()
            }
        }
    }
}
