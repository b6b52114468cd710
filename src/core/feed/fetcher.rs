use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::parser::{parse_feed_bytes, FeedParseError};
use super::types::FeedDocument;

const FEED_ACCEPT: &str =
    "application/rss+xml, application/atom+xml, application/feed+json, application/xml;q=0.9, */*;q=0.8";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    HttpStatus(u16),
    #[error("invalid feed payload: {0}")]
    Parse(#[from] FeedParseError),
    /// The feed service answered, but with an error instead of entries.
    #[error("feed service error: {0}")]
    Service(String),
}

/// The capability the loader delegates to for turning a feed URL into entries.
pub trait FeedFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FeedDocument, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError> {
        let response = self.client.get(url).header(ACCEPT, FEED_ACCEPT).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = response.bytes().await?;
        tracing::debug!(
            url,
            bytes = body.len(),
            content_type = content_type.as_deref().unwrap_or("unknown"),
            "fetched feed payload"
        );

        Ok(parse_feed_bytes(&body)?)
    }
}
