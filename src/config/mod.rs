// src/config/mod.rs
pub mod brief;
pub mod secrets;

pub use brief::{
    BriefConfig, EmailConfig, FeedsConfig, InstrumentConfig, InstrumentKind, ListingsConfig,
    MarketConfig, SummarizerConfig, Transport,
};
pub use secrets::Secrets;
