use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportSource {
    pub title: String,
    pub feed_url: String,
    pub site_url: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("cannot read sources file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid OPML content: {0}")]
    Opml(String),
    #[error("invalid JSON import format: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Opml,
    Json,
    UrlList,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("opml" | "xml") => Self::Opml,
            Some("json") => Self::Json,
            _ => Self::UrlList,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum JsonImportItem {
    Url(String),
    Object {
        #[serde(alias = "url")]
        feed_url: String,
        #[serde(alias = "name")]
        title: Option<String>,
        site_url: Option<String>,
        category: Option<String>,
    },
}

/// Reads a sources file, choosing the parser from the file extension.
pub fn read_sources_file(path: &Path) -> Result<Vec<ImportSource>, ImportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = SourceFormat::from_path(path);
    tracing::debug!(path = %path.display(), ?format, "reading feed sources");
    parse_sources(format, &content)
}

pub fn parse_sources(format: SourceFormat, content: &str) -> Result<Vec<ImportSource>, ImportError> {
    match format {
        SourceFormat::Opml => parse_opml(content),
        SourceFormat::Json => parse_json_sources(content),
        SourceFormat::UrlList => Ok(parse_url_list(content)),
    }
}

pub fn parse_opml(opml_content: &str) -> Result<Vec<ImportSource>, ImportError> {
    let doc = roxmltree::Document::parse(opml_content)
        .map_err(|error| ImportError::Opml(error.to_string()))?;

    let sources = doc
        .descendants()
        .filter(|node| node.has_tag_name("outline"))
        .filter_map(|node| {
            let feed_url = node.attribute("xmlUrl").map(str::trim)?;
            if feed_url.is_empty() {
                return None;
            }
            let title = node
                .attribute("title")
                .or_else(|| node.attribute("text"))
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .unwrap_or(feed_url);
            Some(ImportSource {
                title: title.to_string(),
                feed_url: feed_url.to_string(),
                site_url: node.attribute("htmlUrl").map(ToString::to_string),
                category: node
                    .attribute("category")
                    .map(ToString::to_string)
                    .or_else(|| opml_folder(node)),
            })
        })
        .collect();

    Ok(sources)
}

pub fn parse_url_list(input: &str) -> Vec<ImportSource> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("http://") || line.starts_with("https://"))
        .map(|line| ImportSource {
            title: line.to_string(),
            feed_url: line.to_string(),
            site_url: None,
            category: None,
        })
        .collect()
}

pub fn parse_json_sources(input: &str) -> Result<Vec<ImportSource>, ImportError> {
    let items: Vec<JsonImportItem> = serde_json::from_str(input)?;

    Ok(items
        .into_iter()
        .map(|item| match item {
            JsonImportItem::Url(feed_url) => ImportSource {
                title: feed_url.clone(),
                feed_url,
                site_url: None,
                category: None,
            },
            JsonImportItem::Object {
                feed_url,
                title,
                site_url,
                category,
            } => ImportSource {
                title: title.unwrap_or_else(|| feed_url.clone()),
                feed_url,
                site_url,
                category,
            },
        })
        .collect())
}

/// Splits sources into the first occurrence of every normalized url and the
/// later repeats. Sources with a blank url are dropped.
pub fn dedupe_sources(candidates: Vec<ImportSource>) -> (Vec<ImportSource>, Vec<ImportSource>) {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut duplicates = Vec::new();

    for source in candidates {
        let normalized = normalize_url(&source.feed_url);
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized) {
            kept.push(source);
        } else {
            duplicates.push(source);
        }
    }

    (kept, duplicates)
}

pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

fn opml_folder(node: roxmltree::Node<'_, '_>) -> Option<String> {
    node.ancestors()
        .skip(1)
        .filter(|ancestor| ancestor.has_tag_name("outline"))
        .filter(|ancestor| ancestor.attribute("xmlUrl").is_none())
        .find_map(|ancestor| {
            ancestor
                .attribute("title")
                .or_else(|| ancestor.attribute("text"))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_opml_fixture_with_folders() {
        let opml = include_str!("../../../fixtures/feeds.opml");
        let sources = parse_opml(opml).expect("opml fixture should parse");

        assert_eq!(sources.len(), 4);
        assert_eq!(sources[0].title, "Udacity Blog");
        assert_eq!(sources[0].category.as_deref(), Some("Learning"));
        assert_eq!(sources[0].site_url.as_deref(), Some("https://www.udacity.com/blog"));
        assert_eq!(sources[2].category.as_deref(), Some("css"));
        assert_eq!(sources[3].category.as_deref(), Some("Front-end"));
    }

    #[test]
    fn rejects_malformed_opml() {
        let error = parse_opml("<opml><body>").expect_err("truncated xml must fail");
        assert!(matches!(error, ImportError::Opml(_)));
    }

    #[test]
    fn parses_url_list() {
        let input = r#"
            # comment
            https://example.com/feed.xml
            https://example.com/atom.xml
            not-a-url
        "#;
        let items = parse_url_list(input);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].feed_url, "https://example.com/feed.xml");
    }

    #[test]
    fn parses_json_sources_from_string_and_object() {
        let json = r#"
            [
              "https://example.com/feed.xml",
              { "name": "Udacity Blog", "url": "https://blog.udacity.com/feed" },
              {
                "feed_url": "https://blog.example.com/rss",
                "title": "Blog",
                "category": "tech"
              }
            ]
        "#;

        let items = parse_json_sources(json).expect("json should parse");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "https://example.com/feed.xml");
        assert_eq!(items[1].title, "Udacity Blog");
        assert_eq!(items[2].category.as_deref(), Some("tech"));
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let sources = parse_opml(include_str!("../../../fixtures/feeds.opml")).expect("opml should parse");
        let (kept, duplicates) = dedupe_sources(sources);

        assert_eq!(kept.len(), 3);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].title, "CSS Tricks mirror");
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("feeds.OPML")), SourceFormat::Opml);
        assert_eq!(SourceFormat::from_path(Path::new("feeds.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("feeds.txt")), SourceFormat::UrlList);
        assert_eq!(SourceFormat::from_path(Path::new("feeds")), SourceFormat::UrlList);
    }

    #[test]
    fn reads_sources_file_from_disk() {
        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .expect("temp file should be created");
        writeln!(file, "https://blog.udacity.com/feed").expect("write should succeed");
        writeln!(file, "https://feeds.feedburner.com/CssTricks").expect("write should succeed");

        let sources = read_sources_file(file.path()).expect("file should be read");
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let error = read_sources_file(&dir.path().join("missing.opml")).expect_err("missing file must fail");
        assert!(matches!(error, ImportError::Io { .. }));
    }
}
