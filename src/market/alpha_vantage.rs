// src/market/alpha_vantage.rs
//! Alpha Vantage daily series (`TIME_SERIES_DAILY` for equities,
//! `DIGITAL_CURRENCY_DAILY` for crypto).
//!
//! Alpha Vantage answers errors and throttling with HTTP 200 and a different
//! JSON shape, so the body is decoded into a tagged response first and only
//! the series variant reaches business logic.

use std::collections::BTreeMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::secrets::{require, ENV_ALPHA_VANTAGE};
use crate::config::{InstrumentConfig, InstrumentKind};
use crate::error::SourceError;
use crate::market::{DailyClose, QuoteSource};

const PROVIDER: &str = "alpha_vantage";

#[derive(Debug, Deserialize)]
struct Bar {
    #[serde(rename = "4. close", alias = "4a. close (USD)")]
    close: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DailyResponse {
    Equity {
        #[serde(rename = "Time Series (Daily)")]
        series: BTreeMap<NaiveDate, Bar>,
    },
    Crypto {
        #[serde(rename = "Time Series (Digital Currency Daily)")]
        series: BTreeMap<NaiveDate, Bar>,
    },
    Error {
        #[serde(rename = "Error Message")]
        message: String,
    },
    Throttled {
        #[serde(rename = "Note", alias = "Information")]
        note: String,
    },
}

pub struct AlphaVantage {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantage {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    fn query_params<'a>(instrument: &'a InstrumentConfig, key: &'a str) -> Vec<(&'static str, &'a str)> {
        match instrument.kind {
            InstrumentKind::Equity => vec![
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", instrument.symbol.as_str()),
                ("apikey", key),
            ],
            InstrumentKind::Crypto => vec![
                ("function", "DIGITAL_CURRENCY_DAILY"),
                ("symbol", instrument.symbol.as_str()),
                ("market", instrument.market.as_str()),
                ("apikey", key),
            ],
        }
    }
}

#[async_trait]
impl QuoteSource for AlphaVantage {
    async fn daily_series(
        &self,
        instrument: &InstrumentConfig,
    ) -> Result<Vec<DailyClose>, SourceError> {
        let key = require(&self.api_key, ENV_ALPHA_VANTAGE, SourceError::MissingKey)?;
        let url = format!("{}/query", self.base_url.trim_end_matches('/'));
        let body = self
            .http
            .get(&url)
            .query(&Self::query_params(instrument, key))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_daily_series(&instrument.symbol, &body)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

/// Decode a daily-series body into dated closes (ascending by date).
pub fn parse_daily_series(symbol: &str, body: &str) -> Result<Vec<DailyClose>, SourceError> {
    let resp: DailyResponse = serde_json::from_str(body)?;
    let series = match resp {
        DailyResponse::Equity { series } | DailyResponse::Crypto { series } => series,
        DailyResponse::Error { message } => {
            return Err(SourceError::Provider {
                provider: PROVIDER,
                message,
            })
        }
        DailyResponse::Throttled { note } => {
            return Err(SourceError::Provider {
                provider: PROVIDER,
                message: note,
            })
        }
    };

    series
        .into_iter()
        .map(|(date, bar)| {
            let close = Decimal::from_str(bar.close.trim()).map_err(|_| SourceError::BadNumber {
                symbol: symbol.to_string(),
                raw: bar.close.clone(),
            })?;
            Ok(DailyClose { date, close })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_series_parses_sorted() {
        let body = r#"{
            "Meta Data": {"2. Symbol": "SPY"},
            "Time Series (Daily)": {
                "2026-10-16": {"1. open": "1", "4. close": "110.0000", "5. volume": "10"},
                "2026-10-15": {"1. open": "1", "4. close": "100.0000", "5. volume": "10"}
            }
        }"#;
        let s = parse_daily_series("SPY", body).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].date.to_string(), "2026-10-15");
        assert_eq!(s[1].close, Decimal::from_str("110.0000").unwrap());
    }

    #[test]
    fn crypto_series_accepts_legacy_close_key() {
        let body = r#"{
            "Time Series (Digital Currency Daily)": {
                "2026-10-16": {"4a. close (USD)": "67000.10"},
                "2026-10-15": {"4a. close (USD)": "66000.00"}
            }
        }"#;
        let s = parse_daily_series("BTC", body).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s[1].close.to_string(), "67000.10");
    }

    #[test]
    fn error_and_throttle_payloads_are_provider_errors() {
        let err = parse_daily_series("X", r#"{"Error Message": "Invalid API call."}"#).unwrap_err();
        assert!(matches!(err, SourceError::Provider { ref message, .. } if message == "Invalid API call."));

        let err = parse_daily_series("X", r#"{"Note": "5 calls per minute"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Provider { .. }));

        let err = parse_daily_series("X", r#"{"Information": "rate limit"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Provider { .. }));
    }

    #[test]
    fn unknown_shape_and_bad_numbers_fail() {
        assert!(matches!(
            parse_daily_series("X", r#"{"unexpected": true}"#),
            Err(SourceError::Decode(_))
        ));
        let body = r#"{"Time Series (Daily)": {"2026-10-16": {"4. close": "n/a"}}}"#;
        assert!(matches!(
            parse_daily_series("X", body),
            Err(SourceError::BadNumber { .. })
        ));
    }

    #[test]
    fn crypto_requests_carry_market_param() {
        let inst = InstrumentConfig {
            label: "Bitcoin".into(),
            symbol: "BTC".into(),
            kind: InstrumentKind::Crypto,
            market: "EUR".into(),
        };
        let q = AlphaVantage::query_params(&inst, "k");
        assert!(q.contains(&("function", "DIGITAL_CURRENCY_DAILY")));
        assert!(q.contains(&("market", "EUR")));
    }
}
