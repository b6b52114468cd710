use html2text::render::text_renderer::TrivialDecorator;

use crate::core::feed::registry::FeedRegistry;
use crate::core::feed::types::FeedEntry;

use super::dom::Element;
use super::{classes, ERROR_MESSAGE};

// Wide enough that html2text never wraps a snippet line.
const SNIPPET_WRAP_WIDTH: usize = 10_000;

/// Replaces the container content with one `.entry` per feed entry.
pub fn render_entries(container: &mut Element, entries: &[FeedEntry], snippet_chars: usize) {
    let nodes = entries
        .iter()
        .map(|entry| entry_node(entry, snippet_chars))
        .collect();
    container.replace_children(nodes);
}

/// Replaces the container content with the single error node.
pub fn render_error(container: &mut Element) {
    container.replace_children(vec![Element::new("p")
        .with_class(classes::ERROR_MESSAGE)
        .with_text(ERROR_MESSAGE)]);
}

pub fn render_feed_list(list: &mut Element, registry: &FeedRegistry) {
    let items = registry
        .iter()
        .enumerate()
        .map(|(index, feed)| {
            Element::new("li").with_child(
                Element::new("a")
                    .with_class(classes::FEED_LINK)
                    .with_attr("href", "#")
                    .with_attr("data-id", index.to_string())
                    .with_text(feed.name.as_str()),
            )
        })
        .collect();
    list.replace_children(items);
}

fn entry_node(entry: &FeedEntry, snippet_chars: usize) -> Element {
    let mut article = Element::new("article")
        .with_class(classes::ENTRY)
        .with_child(Element::new("h2").with_text(entry.title.as_str()));

    let snippet = snippet(&entry.content, snippet_chars);
    if !snippet.is_empty() {
        article.push_child(Element::new("p").with_text(snippet));
    }

    Element::new("a")
        .with_class(classes::ENTRY_LINK)
        .with_attr("href", entry.link.as_str())
        .with_child(article)
}

/// Plain-text preview of an entry body, cut at a character boundary.
pub fn snippet(html: &str, max_chars: usize) -> String {
    let text = html2text::config::with_decorator(TrivialDecorator::new())
        .string_from_read(html.as_bytes(), SNIPPET_WRAP_WIDTH)
        .unwrap_or_else(|_| html.to_string());
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::registry::FeedDescriptor;
    use crate::core::view::dom::Selector;

    fn entry(title: &str, content: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            link: format!("https://example.com/{}", title.to_lowercase()),
            content: content.to_string(),
            author: None,
            published_at: None,
        }
    }

    #[test]
    fn entries_replace_previous_content() {
        let mut container = Element::new("div").with_class(classes::FEED);
        render_error(&mut container);
        render_entries(
            &mut container,
            &[entry("One", "<p>first</p>"), entry("Two", "")],
            100,
        );

        assert_eq!(container.count(&Selector::class(classes::ENTRY)), 2);
        assert_eq!(container.count(&Selector::class(classes::ERROR_MESSAGE)), 0);
        assert_eq!(
            container.inner_html(),
            "<a class=\"entry-link\" href=\"https://example.com/one\"><article class=\"entry\"><h2>One</h2><p>first</p></article></a>\
             <a class=\"entry-link\" href=\"https://example.com/two\"><article class=\"entry\"><h2>Two</h2></article></a>"
        );
    }

    #[test]
    fn error_leaves_exactly_one_node() {
        let mut container = Element::new("div").with_class(classes::FEED);
        render_entries(&mut container, &[entry("One", "body")], 100);
        render_error(&mut container);

        assert_eq!(container.children().len(), 1);
        assert_eq!(container.count(&Selector::class(classes::ERROR_MESSAGE)), 1);
        assert_eq!(container.count(&Selector::class(classes::ENTRY)), 0);
    }

    #[test]
    fn feed_list_links_carry_their_index() {
        let registry = FeedRegistry::new(vec![
            FeedDescriptor::new("First", "https://example.com/1"),
            FeedDescriptor::new("Second", "https://example.com/2"),
        ])
        .expect("registry should be valid");
        let mut list = Element::new("ul").with_class(classes::FEED_LIST);
        render_feed_list(&mut list, &registry);

        let links = list.select(&Selector::class(classes::FEED_LINK));
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].attr("data-id"), Some("1"));
        assert_eq!(links[1].text(), Some("Second"));
    }

    #[test]
    fn snippet_strips_markup_and_truncates() {
        assert_eq!(snippet("<p>Hello <b>world</b></p>", 100), "Hello world");
        assert_eq!(snippet("abcdef ghij", 7), "abcdef…");
        assert_eq!(snippet("", 10), "");
    }
}
