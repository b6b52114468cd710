use sha2::{Digest, Sha256};

use crate::core::feed::registry::FeedRegistry;
use crate::core::feed::types::FeedEntry;

use super::classes;
use super::dom::{Element, Selector, SelectorError};
use super::render::{render_entries, render_error, render_feed_list};

const DEFAULT_TITLE: &str = "Feeds";

/// The reader page:
///
/// ```text
/// body.menu-hidden
///   header.header
///     a.menu-icon-link
///     h1.header-title
///   div.slide-menu.menu
///     ul.feed-list > li > a.feed-link[data-id]
///   div.feed
/// ```
///
/// Only the reader mutates the tree, so the fixed elements above are always
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    body: Element,
}

impl Document {
    pub fn new(registry: &FeedRegistry) -> Self {
        let mut feed_list = Element::new("ul").with_class(classes::FEED_LIST);
        render_feed_list(&mut feed_list, registry);

        let body = Element::new("body")
            .with_class(classes::MENU_HIDDEN)
            .with_child(
                Element::new("header")
                    .with_class(classes::HEADER)
                    .with_child(
                        Element::new("a")
                            .with_class(classes::MENU_ICON_LINK)
                            .with_attr("href", "#")
                            .with_child(Element::new("i").with_class("icon-list")),
                    )
                    .with_child(
                        Element::new("h1")
                            .with_class(classes::HEADER_TITLE)
                            .with_text(DEFAULT_TITLE),
                    ),
            )
            .with_child(
                Element::new("div")
                    .with_class(classes::SLIDE_MENU)
                    .with_class(classes::MENU)
                    .with_child(feed_list),
            )
            .with_child(Element::new("div").with_class(classes::FEED));

        Self { body }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    pub fn select(&self, selector: &str) -> Result<Vec<&Element>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self.body.select(&selector))
    }

    pub fn count(&self, selector: &str) -> Result<usize, SelectorError> {
        Ok(self.select(selector)?.len())
    }

    pub fn title(&self) -> Option<&str> {
        self.body
            .find_class(classes::HEADER_TITLE)
            .and_then(Element::text)
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(header) = self.body.find_class_mut(classes::HEADER_TITLE) {
            header.set_text(title);
        }
    }

    pub fn show_entries(&mut self, entries: &[FeedEntry], snippet_chars: usize) {
        if let Some(container) = self.body.find_class_mut(classes::FEED) {
            render_entries(container, entries, snippet_chars);
        }
    }

    pub fn show_error(&mut self) {
        if let Some(container) = self.body.find_class_mut(classes::FEED) {
            render_error(container);
        }
    }

    /// Inner HTML of the `.feed` container.
    pub fn feed_html(&self) -> String {
        self.body
            .find_class(classes::FEED)
            .map(Element::inner_html)
            .unwrap_or_default()
    }

    /// SHA-256 of the `.feed` container's inner HTML, as lowercase hex.
    pub fn feed_digest(&self) -> String {
        let digest = Sha256::digest(self.feed_html().as_bytes());
        format!("{digest:x}")
    }

    pub fn html(&self) -> String {
        self.body.outer_html()
    }
}
