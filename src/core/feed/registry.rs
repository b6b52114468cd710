use serde::{Deserialize, Serialize};

use crate::core::importer::{dedupe_sources, ImportSource};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedDescriptor {
    pub name: String,
    pub url: String,
}

impl FeedDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("feed registry must contain at least one feed")]
    Empty,
    #[error("feed #{index} has an empty name")]
    MissingName { index: usize },
    #[error("feed #{index} has an empty url")]
    MissingUrl { index: usize },
}

/// Ordered, immutable list of the feeds the reader can show.
///
/// A registry always holds at least one feed, and every feed has a non-empty
/// name and url. Index 0 is the feed shown on startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRegistry {
    feeds: Vec<FeedDescriptor>,
}

impl FeedRegistry {
    pub fn new(feeds: Vec<FeedDescriptor>) -> Result<Self, RegistryError> {
        if feeds.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (index, feed) in feeds.iter().enumerate() {
            if feed.name.trim().is_empty() {
                return Err(RegistryError::MissingName { index });
            }
            if feed.url.trim().is_empty() {
                return Err(RegistryError::MissingUrl { index });
            }
        }
        Ok(Self { feeds })
    }

    /// The feeds the reader ships with.
    pub fn builtin() -> Self {
        Self {
            feeds: vec![
                FeedDescriptor::new("Udacity Blog", "https://blog.udacity.com/feed"),
                FeedDescriptor::new("CSS Tricks", "https://feeds.feedburner.com/CssTricks"),
                FeedDescriptor::new("HTML5 Rocks", "https://feeds.feedburner.com/html5rocks"),
                FeedDescriptor::new(
                    "Linear Digressions",
                    "https://feeds.feedburner.com/udacity-linear-digressions",
                ),
            ],
        }
    }

    /// Builds a registry from imported sources, keeping the first source of
    /// every normalized url.
    pub fn from_sources(sources: Vec<ImportSource>) -> Result<Self, RegistryError> {
        let (kept, duplicates) = dedupe_sources(sources);
        for duplicate in &duplicates {
            tracing::warn!(url = %duplicate.feed_url, "skipping duplicate feed source");
        }
        let feeds = kept
            .into_iter()
            .map(|source| FeedDescriptor {
                name: source.title,
                url: source.feed_url,
            })
            .collect();
        Self::new(feeds)
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FeedDescriptor> {
        self.feeds.get(index)
    }

    /// Resolves a caller-supplied index, which may be negative or past the end.
    pub fn resolve(&self, index: i64) -> Option<(usize, &FeedDescriptor)> {
        let position = usize::try_from(index).ok()?;
        self.feeds.get(position).map(|feed| (position, feed))
    }

    pub fn default_feed(&self) -> &FeedDescriptor {
        &self.feeds[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedDescriptor> {
        self.feeds.iter()
    }
}

impl<'a> IntoIterator for &'a FeedRegistry {
    type Item = &'a FeedDescriptor;
    type IntoIter = std::slice::Iter<'a, FeedDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.feeds.iter()
    }
}
