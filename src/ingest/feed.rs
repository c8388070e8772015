// src/ingest/feed.rs
//! Feed Fetcher: GET one RSS document and parse the first channel's items.
//!
//! `fetch_feed` never fails: any transport, status or XML problem is logged
//! and yields an empty collection so the brief only loses that section.

use metrics::counter;
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

use crate::error::SourceError;
use crate::ingest::normalize_text;
use crate::ingest::types::{FeedCollection, FeedItem};

/// Descriptions longer than this are cut before they reach the prompt.
pub const DESCRIPTION_CAP: usize = 500;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> FeedCollection {
    match try_fetch_feed(client, url).await {
        Ok(items) => {
            counter!("brief_feed_items_total").increment(items.len() as u64);
            tracing::debug!(%url, items = items.len(), "feed fetched");
            items
        }
        Err(e) => {
            tracing::warn!(error = %e, %url, "feed unavailable; section left empty");
            counter!("brief_source_errors_total", "source" => "feed").increment(1);
            FeedCollection::default()
        }
    }
}

async fn try_fetch_feed(client: &reqwest::Client, url: &str) -> Result<FeedCollection, SourceError> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_feed(&body)
}

/// Parse an RSS 2.0 body. Only the first `<channel>` is read.
pub fn parse_feed(xml: &str) -> Result<FeedCollection, SourceError> {
    let xml_clean = wrap_markup_descriptions(&scrub_html_entities_for_xml(xml));
    let rss: Rss = from_str(&xml_clean)?;

    let Some(channel) = rss.channel.into_iter().next() else {
        return Ok(FeedCollection::default());
    };

    let items = channel
        .item
        .into_iter()
        .map(|it| FeedItem {
            title: clean_field(it.title, usize::MAX),
            description: clean_field(it.description, DESCRIPTION_CAP),
            link: it
                .link
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            published_at: it.pub_date.as_deref().and_then(parse_pub_date),
        })
        .collect();

    Ok(FeedCollection::new(items))
}

fn clean_field(raw: Option<String>, cap: usize) -> Option<String> {
    let mut text = normalize_text(raw.as_deref()?);
    if text.chars().count() > cap {
        text = text.chars().take(cap).collect::<String>();
        text.push('…');
    }
    (!text.is_empty()).then_some(text)
}

fn parse_pub_date(ts: &str) -> Option<OffsetDateTime> {
    let ts = ts.trim();
    OffsetDateTime::parse(ts, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(ts, &Rfc3339))
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC))
}

// HTML entities are common in feeds but undefined in XML.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

// Some feeds inline raw XHTML in <description>. Fold it into CDATA so the
// item still deserializes as text; tags are stripped later by normalize_text.
fn wrap_markup_descriptions(s: &str) -> String {
    static RE_DESC: OnceCell<Regex> = OnceCell::new();
    let re = RE_DESC.get_or_init(|| {
        Regex::new(r"(?s)<description>(.*?)</description>").expect("description regex")
    });
    re.replace_all(s, |caps: &Captures<'_>| {
        let body = &caps[1];
        if !body.contains('<') || body.trim_start().starts_with("<![CDATA[") {
            return caps[0].to_string();
        }
        let body = body.replace("]]>", "]]]]><![CDATA[>");
        format!("<description><![CDATA[{body}]]></description>")
    })
    .into_owned()
}
