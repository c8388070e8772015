// src/ingest/mod.rs
pub mod feed;
pub mod types;

pub use feed::{fetch_feed, parse_feed};
pub use types::{FeedCollection, FeedItem};

use once_cell::sync::OnceCell;
use regex::Regex;

/// Normalize feed text for the prompt: decode entities, strip tags,
/// ASCII-fy typographic quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[a-z][^>]*>").expect("tag regex"));
    out = re_tags.replace_all(&out, " ").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").expect("ws regex"));
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

/// Plain-text rendering of an HTML document, one block per line.
/// Used for the text/plain alternative of the email.
pub fn html_to_text(html: &str) -> String {
    static RE_BLOCK: OnceCell<Regex> = OnceCell::new();
    let re_block = RE_BLOCK.get_or_init(|| {
        Regex::new(r"(?i)<\s*(br|/p|/li|/h[1-6]|/ul|/ol|/div)\s*/?>").expect("block regex")
    });
    static RE_LI: OnceCell<Regex> = OnceCell::new();
    let re_li = RE_LI.get_or_init(|| Regex::new(r"(?i)<\s*li[^>]*>").expect("li regex"));

    let marked = re_li.replace_all(html, "\n- ");
    let marked = re_block.replace_all(&marked, "\n");

    marked
        .lines()
        .map(normalize_text)
        .filter(|l| !l.is_empty() && l != "-")
        .collect::<Vec<_>>()
        .join("\n")
}
