// tests/market_snapshot.rs
//
// Market Data Collector against a mocked Alpha Vantage: daily-close delta,
// all-or-nothing failure policy, zero previous close.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use daily_brief::config::{InstrumentConfig, InstrumentKind};
use daily_brief::market::{AlphaVantage, MarketCollector, MARKET_UNAVAILABLE};

fn equity(label: &str, symbol: &str) -> InstrumentConfig {
    InstrumentConfig {
        label: label.into(),
        symbol: symbol.into(),
        kind: InstrumentKind::Equity,
        market: "USD".into(),
    }
}

fn daily(previous: &str, latest: &str) -> serde_json::Value {
    json!({
        "Meta Data": { "2. Symbol": "X" },
        "Time Series (Daily)": {
            "2026-10-15": { "1. open": "1.0", "4. close": "1.0000" },
            "2026-10-16": { "1. open": "1.0", "4. close": previous },
            "2026-10-17": { "1. open": "1.0", "4. close": latest }
        }
    })
}

async fn mount_symbol(server: &MockServer, symbol: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .and(query_param("symbol", symbol))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn collector(server: &MockServer, key: Option<&str>, instruments: Vec<InstrumentConfig>) -> MarketCollector {
    MarketCollector::new(
        Arc::new(AlphaVantage::new(
            reqwest::Client::new(),
            server.uri(),
            key.map(str::to_string),
        )),
        instruments,
    )
}

#[tokio::test]
async fn renders_every_instrument_with_signed_percent() {
    let server = MockServer::start().await;
    mount_symbol(&server, "SPY", daily("100.0000", "110.0000")).await;
    mount_symbol(&server, "QQQ", daily("400.00", "396.5")).await;

    let c = collector(
        &server,
        Some("test-key"),
        vec![equity("S&P 500 (SPY)", "SPY"), equity("Nasdaq 100 (QQQ)", "QQQ")],
    );
    let out = c.fetch_market_snapshot().await;
    assert_eq!(
        out,
        "S&P 500 (SPY): $110.00 (+10.00%)\nNasdaq 100 (QQQ): $396.50 (-0.88%)"
    );
}

#[tokio::test]
async fn crypto_uses_digital_currency_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "DIGITAL_CURRENCY_DAILY"))
        .and(query_param("symbol", "BTC"))
        .and(query_param("market", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Time Series (Digital Currency Daily)": {
                "2026-10-16": { "4a. close (USD)": "60000.00" },
                "2026-10-17": { "4a. close (USD)": "61500.00" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let btc = InstrumentConfig {
        label: "Bitcoin (BTC)".into(),
        symbol: "BTC".into(),
        kind: InstrumentKind::Crypto,
        market: "USD".into(),
    };
    let out = collector(&server, Some("test-key"), vec![btc]).fetch_market_snapshot().await;
    assert_eq!(out, "Bitcoin (BTC): $61500.00 (+2.50%)");
}

#[tokio::test]
async fn one_failing_instrument_replaces_the_whole_snapshot() {
    let server = MockServer::start().await;
    mount_symbol(&server, "SPY", daily("100", "101")).await;
    mount_symbol(
        &server,
        "QQQ",
        json!({ "Error Message": "Invalid API call. Please retry or visit the documentation." }),
    )
    .await;

    let c = collector(
        &server,
        Some("test-key"),
        vec![equity("SPY", "SPY"), equity("QQQ", "QQQ")],
    );
    assert_eq!(c.fetch_market_snapshot().await, MARKET_UNAVAILABLE);
}

#[tokio::test]
async fn throttle_note_is_a_failure() {
    let server = MockServer::start().await;
    mount_symbol(
        &server,
        "SPY",
        json!({ "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute." }),
    )
    .await;

    let c = collector(&server, Some("test-key"), vec![equity("SPY", "SPY")]);
    assert_eq!(c.fetch_market_snapshot().await, MARKET_UNAVAILABLE);
}

#[tokio::test]
async fn zero_previous_close_is_an_error_not_infinity() {
    let server = MockServer::start().await;
    mount_symbol(&server, "SPY", daily("0.0000", "5.0000")).await;

    let c = collector(&server, Some("test-key"), vec![equity("SPY", "SPY")]);
    let err = c.collect().await.unwrap_err();
    assert!(matches!(
        err,
        daily_brief::error::SourceError::ZeroPreviousClose { ref symbol } if symbol == "SPY"
    ));
}

#[tokio::test]
async fn missing_key_degrades_without_calling_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let c = collector(&server, None, vec![equity("SPY", "SPY")]);
    assert_eq!(c.fetch_market_snapshot().await, MARKET_UNAVAILABLE);
}
