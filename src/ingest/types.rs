// src/ingest/types.rs
use time::OffsetDateTime;

pub const NO_TITLE: &str = "No title";
pub const NO_DESCRIPTION: &str = "No description";
pub const NO_LINK: &str = "No link";

/// One parsed syndication entry. Absent fields stay `None`; placeholders are
/// applied only when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub published_at: Option<OffsetDateTime>,
}

impl FeedItem {
    /// `{title} ({link}) - {description}` with placeholders for missing parts.
    pub fn render_line(&self) -> String {
        format!(
            "{} ({}) - {}",
            self.title.as_deref().unwrap_or(NO_TITLE),
            self.link.as_deref().unwrap_or(NO_LINK),
            self.description.as_deref().unwrap_or(NO_DESCRIPTION),
        )
    }
}

/// Items in the feed's native order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedCollection {
    items: Vec<FeedItem>,
}

impl FeedCollection {
    pub fn new(items: Vec<FeedItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// First `n` items in source order.
    pub fn top(&self, n: usize) -> &[FeedItem] {
        &self.items[..self.items.len().min(n)]
    }

    /// Render the first `n` items, one per line.
    pub fn render_top(&self, n: usize) -> String {
        self.top(n)
            .iter()
            .map(FeedItem::render_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
