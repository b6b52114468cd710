use std::path::PathBuf;
use std::time::Duration;

use crate::core::feed::loader::DEFAULT_SNIPPET_CHARS;

pub const REGISTRY_KEY: &str = "FEEDREADER_REGISTRY";
pub const TIMEOUT_KEY: &str = "FEEDREADER_TIMEOUT_SECS";
pub const USER_AGENT_KEY: &str = "FEEDREADER_USER_AGENT";
pub const INITIAL_FEED_KEY: &str = "FEEDREADER_INITIAL_FEED";
pub const SNIPPET_CHARS_KEY: &str = "FEEDREADER_SNIPPET_CHARS";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_USER_AGENT: &str = concat!("feedreader/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("FEEDREADER_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Sources file to build the registry from; the built-in feeds otherwise.
    pub registry_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Feed shown on startup. May point outside the registry, which renders
    /// the error state like any other invalid index.
    pub initial_feed: i64,
    pub snippet_chars: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            registry_path: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            initial_feed: 0,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

impl ReaderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, treating blank values as unset.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        let request_timeout = match parse_number::<u64>(TIMEOUT_KEY, value(TIMEOUT_KEY))? {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.request_timeout,
        };

        Ok(Self {
            registry_path: value(REGISTRY_KEY).map(PathBuf::from),
            request_timeout,
            user_agent: value(USER_AGENT_KEY).unwrap_or(defaults.user_agent),
            initial_feed: parse_number(INITIAL_FEED_KEY, value(INITIAL_FEED_KEY))?
                .unwrap_or(defaults.initial_feed),
            snippet_chars: parse_number(SNIPPET_CHARS_KEY, value(SNIPPET_CHARS_KEY))?
                .unwrap_or(defaults.snippet_chars),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ReaderConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ReaderConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = config_from(&[(USER_AGENT_KEY, "   ")]).expect("defaults should be valid");
        assert_eq!(config, ReaderConfig::default());
        assert_eq!(config.request_timeout, Duration::from_secs(20));
        assert!(config.user_agent.starts_with("feedreader/"));
    }

    #[test]
    fn reads_every_setting() {
        let config = config_from(&[
            (REGISTRY_KEY, "/etc/feedreader/feeds.opml"),
            (TIMEOUT_KEY, "5"),
            (USER_AGENT_KEY, "reader-bot"),
            (INITIAL_FEED_KEY, "-1"),
            (SNIPPET_CHARS_KEY, "80"),
        ])
        .expect("config should be valid");

        assert_eq!(config.registry_path, Some(PathBuf::from("/etc/feedreader/feeds.opml")));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "reader-bot");
        assert_eq!(config.initial_feed, -1);
        assert_eq!(config.snippet_chars, 80);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert_eq!(config_from(&[(TIMEOUT_KEY, "0")]), Err(ConfigError::ZeroTimeout));
        assert_eq!(
            config_from(&[(SNIPPET_CHARS_KEY, "many")]),
            Err(ConfigError::InvalidNumber {
                key: SNIPPET_CHARS_KEY,
                value: "many".to_string(),
            })
        );
    }
}
