use super::fetcher::{FeedFetcher, FetchError};
use super::registry::FeedRegistry;
use crate::core::view::document::Document;

pub const DEFAULT_SNIPPET_CHARS: usize = 280;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("feed index {index} is outside the registry of {len} feeds")]
    InvalidIndex { index: i64, len: usize },
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// How a load attempt ended. Both failure kinds render the same error node.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        index: usize,
        name: String,
        entries: usize,
        /// Digest of the feed container after rendering.
        digest: String,
    },
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Loaded { .. } => None,
            Self::Failed(error) => Some(error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedLoader<F> {
    registry: FeedRegistry,
    fetcher: F,
    snippet_chars: usize,
}

impl<F: FeedFetcher> FeedLoader<F> {
    pub fn new(registry: FeedRegistry, fetcher: F) -> Self {
        Self {
            registry,
            fetcher,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }

    pub fn with_snippet_chars(mut self, snippet_chars: usize) -> Self {
        self.snippet_chars = snippet_chars;
        self
    }

    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    /// Loads the feed at `index` into the document's feed container,
    /// replacing whatever it showed before.
    ///
    /// Never fails: an index outside the registry or a failed fetch renders
    /// the error node and comes back as [`LoadOutcome::Failed`].
    pub async fn load(&self, index: i64, document: &mut Document) -> LoadOutcome {
        let Some((position, feed)) = self.registry.resolve(index) else {
            tracing::warn!(index, feeds = self.registry.len(), "feed index out of range");
            document.show_error();
            return LoadOutcome::Failed(LoadError::InvalidIndex {
                index,
                len: self.registry.len(),
            });
        };

        tracing::debug!(index = position, feed = %feed.name, url = %feed.url, "loading feed");
        match self.fetcher.fetch(&feed.url).await {
            Ok(fetched) => {
                document.set_title(&feed.name);
                document.show_entries(&fetched.entries, self.snippet_chars);
                tracing::info!(
                    index = position,
                    feed = %feed.name,
                    entries = fetched.entries.len(),
                    "feed loaded"
                );
                LoadOutcome::Loaded {
                    index: position,
                    name: feed.name.clone(),
                    entries: fetched.entries.len(),
                    digest: document.feed_digest(),
                }
            }
            Err(error) => {
                tracing::warn!(index = position, feed = %feed.name, %error, "feed failed to load");
                document.show_error();
                LoadOutcome::Failed(LoadError::Fetch(error))
            }
        }
    }

    /// [`load`](Self::load), then `on_complete` once rendering is done.
    pub async fn load_feed<C>(&self, index: i64, document: &mut Document, on_complete: C) -> LoadOutcome
    where
        C: FnOnce(&LoadOutcome, &Document),
    {
        let outcome = self.load(index, document).await;
        on_complete(&outcome, document);
        outcome
    }
}
