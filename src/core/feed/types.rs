use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FeedFormat {
    XmlFeed,
    JsonFeed,
}

/// One item of a fetched feed, ready to be rendered as an `.entry` node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// HTML body of the item: the summary when present, the full content otherwise.
    pub content: String,
    pub author: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedDocument {
    pub format: FeedFormat,
    pub title: String,
    pub entries: Vec<FeedEntry>,
}
