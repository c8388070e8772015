// src/config/brief.rs
//! Process-wide brief configuration.
//!
//! Loaded once at startup and shared read-only (`Arc<BriefConfig>`).
//! Lookup order:
//! 1) $BRIEF_CONFIG_PATH (must exist if set)
//! 2) config/brief.toml
//! 3) built-in defaults
//!
//! Env overrides applied afterwards: BRIEF_SECTIONS, BRIEF_RECIPIENTS, BRIEF_EMAIL_TRANSPORT.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::brief::sections::{Section, SectionSet};
use crate::error::ConfigError;

pub const ENV_CONFIG_PATH: &str = "BRIEF_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/brief.toml";

const ENV_SECTIONS: &str = "BRIEF_SECTIONS";
const ENV_RECIPIENTS: &str = "BRIEF_RECIPIENTS";
const ENV_TRANSPORT: &str = "BRIEF_EMAIL_TRANSPORT";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BriefConfig {
    /// Enabled sections; order here is irrelevant, see `Section`.
    pub sections: Vec<Section>,
    pub feeds: FeedsConfig,
    pub market: MarketConfig,
    pub listings: ListingsConfig,
    pub summarizer: SummarizerConfig,
    pub email: EmailConfig,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            sections: Section::ALL.to_vec(),
            feeds: FeedsConfig::default(),
            market: MarketConfig::default(),
            listings: ListingsConfig::default(),
            summarizer: SummarizerConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub ai_news: String,
    pub tech_news: String,
    pub world_news: String,
    /// Top-N items kept per feed before rendering.
    pub max_items: usize,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            ai_news: "https://techcrunch.com/category/artificial-intelligence/feed/".into(),
            tech_news: "https://news.google.com/rss/headlines/section/topic/TECHNOLOGY?hl=en-US&gl=US&ceid=US:en".into(),
            world_news: "https://news.google.com/rss/headlines/section/topic/WORLD?hl=en-US&gl=US&ceid=US:en".into(),
            max_items: 10,
        }
    }
}

impl FeedsConfig {
    pub fn url_for(&self, section: Section) -> Option<&str> {
        match section {
            Section::AiNews => Some(&self.ai_news),
            Section::TechNews => Some(&self.tech_news),
            Section::WorldNews => Some(&self.world_news),
            Section::Markets | Section::Launches => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    Equity,
    Crypto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentConfig {
    /// Display name, e.g. "S&P 500 (SPY)".
    pub label: String,
    pub symbol: String,
    pub kind: InstrumentKind,
    /// Quote currency for crypto series.
    #[serde(default = "default_fiat")]
    pub market: String,
}

fn default_fiat() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub base_url: String,
    pub instruments: Vec<InstrumentConfig>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.alphavantage.co".into(),
            instruments: vec![
                InstrumentConfig {
                    label: "S&P 500 (SPY)".into(),
                    symbol: "SPY".into(),
                    kind: InstrumentKind::Equity,
                    market: default_fiat(),
                },
                InstrumentConfig {
                    label: "Nasdaq 100 (QQQ)".into(),
                    symbol: "QQQ".into(),
                    kind: InstrumentKind::Equity,
                    market: default_fiat(),
                },
                InstrumentConfig {
                    label: "Bitcoin (BTC)".into(),
                    symbol: "BTC".into(),
                    kind: InstrumentKind::Crypto,
                    market: default_fiat(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingsConfig {
    pub endpoint: String,
    /// Top-K listings requested and rendered.
    pub limit: usize,
    /// Window length ending at invocation time.
    pub window_hours: i64,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.producthunt.com/v2/api/graphql".into(),
            limit: 10,
            window_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            max_tokens: 1500,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Resend,
    Smtp,
    Log,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resend" => Ok(Transport::Resend),
            "smtp" => Ok(Transport::Smtp),
            "log" => Ok(Transport::Log),
            other => Err(ConfigError::UnknownTransport(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub transport: Transport,
    pub from: String,
    pub recipients: Vec<String>,
    pub subject_prefix: String,
    pub resend_base_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Resend,
            from: "Daily Brief <brief@example.com>".into(),
            recipients: Vec::new(),
            subject_prefix: "Daily Brief".into(),
            resend_base_url: "https://api.resend.com".into(),
        }
    }
}

impl BriefConfig {
    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::parse(&content, &display)
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Load using env var + fallbacks, then apply env overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(ConfigError::MissingPath(ENV_CONFIG_PATH));
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(raw) = non_empty_env(ENV_SECTIONS) {
            self.sections = SectionSet::parse_list(&raw)?.iter().collect();
        }
        if let Some(raw) = non_empty_env(ENV_RECIPIENTS) {
            self.email.recipients = split_recipients(&raw);
        }
        if let Some(raw) = non_empty_env(ENV_TRANSPORT) {
            self.email.transport = raw.parse()?;
        }
        Ok(())
    }

    pub fn section_set(&self) -> SectionSet {
        self.sections.iter().copied().collect()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Split a comma separated recipient list; trims and drops blanks and duplicates.
pub fn split_recipients(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for r in raw.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        if !out.iter().any(|x| x.eq_ignore_ascii_case(r)) {
            out.push(r.to_string());
        }
    }
    out
}
