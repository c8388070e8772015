// src/error.rs
//! Error taxonomy for one brief invocation.
//!
//! `SourceError` is always recovered at the collector boundary (the section
//! degrades to empty or a placeholder). `SummarizeError` and `DeliveryError`
//! abort the invocation and surface as a 500 to the trigger caller.

use thiserror::Error;

/// A single feed, instrument or listing fetch failed.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider error from {provider}: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("missing configuration key {0}")]
    MissingKey(&'static str),

    #[error("{symbol}: need two daily observations, got {got}")]
    InsufficientHistory { symbol: String, got: usize },

    #[error("{symbol}: previous close is zero")]
    ZeroPreviousClose { symbol: String },

    #[error("{symbol}: price change out of range")]
    Overflow { symbol: String },

    #[error("{symbol}: unparseable close value {raw:?}")]
    BadNumber { symbol: String, raw: String },
}

/// The generative API call itself failed (not: returned empty content).
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("missing configuration key {0}")]
    MissingKey(&'static str),

    #[error("summarizer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarizer returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// The email could not be handed to the delivery provider.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("missing configuration key {0}")]
    MissingKey(&'static str),

    #[error("no recipients configured")]
    NoRecipients,

    #[error("delivery request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("delivery provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("delivery provider rejected message: {0}")]
    Rejected(String),

    #[error("invalid mailbox {0:?}")]
    Mailbox(String),

    #[error("smtp: {0}")]
    Smtp(String),
}

/// Fatal failure of one invocation.
#[derive(Debug, Error)]
pub enum BriefError {
    #[error("summarization failed: {0}")]
    Summarization(#[from] SummarizeError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Problems found while loading `BriefConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0} points to a non-existent path")]
    MissingPath(&'static str),

    #[error("unknown section {0:?}")]
    UnknownSection(String),

    #[error("unknown email transport {0:?}")]
    UnknownTransport(String),
}
