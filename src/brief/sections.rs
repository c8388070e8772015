// src/brief/sections.rs
//! The fixed, ordered set of brief sections and the toggle set built from config.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Declaration order IS the prompt order. Reordering variants changes the
/// structure of every generated brief.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    AiNews,
    TechNews,
    WorldNews,
    Markets,
    Launches,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::AiNews,
        Section::TechNews,
        Section::WorldNews,
        Section::Markets,
        Section::Launches,
    ];

    /// Heading used both in the prompt and in the generated HTML.
    pub fn title(self) -> &'static str {
        match self {
            Section::AiNews => "AI News",
            Section::TechNews => "Tech & Company News",
            Section::WorldNews => "World News",
            Section::Markets => "Markets",
            Section::Launches => "Product Launches",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Section::AiNews => "ai_news",
            Section::TechNews => "tech_news",
            Section::WorldNews => "world_news",
            Section::Markets => "markets",
            Section::Launches => "launches",
        }
    }

    pub fn is_feed(self) -> bool {
        matches!(
            self,
            Section::AiNews | Section::TechNews | Section::WorldNews
        )
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        Section::ALL
            .into_iter()
            .find(|sec| sec.key() == norm)
            .ok_or_else(|| ConfigError::UnknownSection(s.trim().to_string()))
    }
}

/// Enabled sections. Iteration always follows `Section` declaration order,
/// regardless of the order they were listed in config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSet(BTreeSet<Section>);

impl SectionSet {
    pub fn all() -> Self {
        Self(Section::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, s: Section) -> bool {
        self.0.contains(&s)
    }

    pub fn iter(&self) -> impl Iterator<Item = Section> + '_ {
        self.0.iter().copied()
    }

    pub fn feeds(&self) -> impl Iterator<Item = Section> + '_ {
        self.iter().filter(|s| s.is_feed())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parse a comma separated list such as `ai_news, markets`.
    pub fn parse_list(raw: &str) -> Result<Self, ConfigError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Section::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }
}

impl Default for SectionSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Section> for SectionSet {
    fn from_iter<I: IntoIterator<Item = Section>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
