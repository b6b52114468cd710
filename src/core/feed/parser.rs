use feed_rs::model::Entry;
use serde::Deserialize;

use super::types::{FeedDocument, FeedEntry, FeedFormat};

const UNTITLED_FEED: &str = "Untitled Feed";
const UNTITLED_ENTRY: &str = "Untitled Entry";

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("feed payload is empty")]
    EmptyPayload,
    #[error("xml feed parse error: {0}")]
    Xml(#[from] feed_rs::parser::ParseFeedError),
    #[error("json feed parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct JsonFeed {
    title: Option<String>,
    #[serde(default)]
    items: Vec<JsonFeedItem>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedItem {
    title: Option<String>,
    url: Option<String>,
    summary: Option<String>,
    content_html: Option<String>,
    content_text: Option<String>,
    date_published: Option<String>,
    #[serde(default)]
    authors: Vec<JsonFeedAuthor>,
    // JSON Feed 1.0 used a single author object.
    author: Option<JsonFeedAuthor>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedAuthor {
    name: Option<String>,
}

/// Parses a fetched payload, sniffing JSON Feed by its leading `{` and
/// handing everything else to the RSS/Atom parser.
pub fn parse_feed_bytes(raw: &[u8]) -> Result<FeedDocument, FeedParseError> {
    let start = raw
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(raw.len());
    let trimmed = &raw[start..];
    match trimmed.first() {
        None => Err(FeedParseError::EmptyPayload),
        Some(b'{') => parse_json_feed(trimmed),
        Some(_) => parse_xml_feed(trimmed),
    }
}

fn parse_xml_feed(raw: &[u8]) -> Result<FeedDocument, FeedParseError> {
    let feed = feed_rs::parser::parse(raw)?;
    let title = feed
        .title
        .map(|text| text.content)
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| UNTITLED_FEED.to_string());

    Ok(FeedDocument {
        format: FeedFormat::XmlFeed,
        title,
        entries: feed.entries.iter().map(xml_entry).collect(),
    })
}

fn xml_entry(entry: &Entry) -> FeedEntry {
    let content = entry
        .summary
        .as_ref()
        .map(|text| text.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|content| content.body.clone()))
        .unwrap_or_default();

    FeedEntry {
        title: entry
            .title
            .as_ref()
            .map(|text| text.content.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED_ENTRY.to_string()),
        link: entry
            .links
            .first()
            .map(|link| link.href.clone())
            .unwrap_or_default(),
        content,
        author: entry
            .authors
            .iter()
            .map(|person| person.name.trim())
            .find(|name| !name.is_empty())
            .map(ToString::to_string),
        published_at: entry
            .published
            .or(entry.updated)
            .map(|timestamp| timestamp.to_rfc3339()),
    }
}

fn parse_json_feed(raw: &[u8]) -> Result<FeedDocument, FeedParseError> {
    let feed: JsonFeed = serde_json::from_slice(raw)?;

    let entries = feed
        .items
        .into_iter()
        .map(|item| {
            let author = item
                .authors
                .into_iter()
                .chain(item.author)
                .find_map(|author| author.name)
                .filter(|name| !name.trim().is_empty());
            FeedEntry {
                title: item.title.unwrap_or_else(|| UNTITLED_ENTRY.to_string()),
                link: item.url.unwrap_or_default(),
                content: item
                    .summary
                    .or(item.content_html)
                    .or(item.content_text)
                    .unwrap_or_default(),
                author,
                published_at: item.date_published,
            }
        })
        .collect();

    Ok(FeedDocument {
        format: FeedFormat::JsonFeed,
        title: feed.title.unwrap_or_else(|| UNTITLED_FEED.to_string()),
        entries,
    })
}
