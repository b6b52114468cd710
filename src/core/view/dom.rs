use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unsupported selector part {0:?}, only class selectors are supported")]
    Unsupported(String),
}

/// A chain of class selectors joined by the descendant combinator, such as
/// `.menu-hidden .menu`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    classes: Vec<String>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let classes = input
            .split_whitespace()
            .map(|part| match part.strip_prefix('.') {
                Some(class) if is_class_name(class) => Ok(class.to_string()),
                _ => Err(SelectorError::Unsupported(part.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if classes.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { classes })
    }

    pub fn class(class: &str) -> Self {
        Self {
            classes: vec![class.to_string()],
        }
    }

    // Descendant-only chains can be matched greedily from the nearest ancestor.
    fn matches(&self, element: &Element, ancestors: &[&Element]) -> bool {
        let Some((last, rest)) = self.classes.split_last() else {
            return false;
        };
        if !element.has_class(last) {
            return false;
        }
        let mut pending = rest.iter().rev().peekable();
        for ancestor in ancestors.iter().rev() {
            match pending.peek() {
                Some(class) if ancestor.has_class(class) => {
                    pending.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        pending.peek().is_none()
    }
}

fn is_class_name(class: &str) -> bool {
    !class.is_empty()
        && class
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A node of the rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|existing| existing != class);
    }

    /// Flips `class` and returns whether the element has it afterwards.
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Drops every child and text node, then inserts `children`.
    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.text = None;
        self.children = children;
    }

    /// All elements under this one (this one included) matching `selector`,
    /// in document order.
    pub fn select(&self, selector: &Selector) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut ancestors = Vec::new();
        collect_matches(self, selector, &mut ancestors, &mut found);
        found
    }

    pub fn count(&self, selector: &Selector) -> usize {
        self.select(selector).len()
    }

    pub fn find_class(&self, class: &str) -> Option<&Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_class(class))
    }

    pub fn find_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_class_mut(class))
    }

    pub fn inner_html(&self) -> String {
        let mut html = String::new();
        self.write_inner(&mut html);
        html
    }

    pub fn outer_html(&self) -> String {
        let mut html = String::new();
        self.write_outer(&mut html);
        html
    }

    fn write_inner(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(&escape_html(text));
        }
        for child in &self.children {
            child.write_outer(out);
        }
    }

    fn write_outer(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_html(&self.classes.join(" ")));
        }
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_html(value));
        }
        out.push('>');
        self.write_inner(out);
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn collect_matches<'a>(
    element: &'a Element,
    selector: &Selector,
    ancestors: &mut Vec<&'a Element>,
    found: &mut Vec<&'a Element>,
) {
    if selector.matches(element, ancestors) {
        found.push(element);
    }
    ancestors.push(element);
    for child in &element.children {
        collect_matches(child, selector, ancestors, found);
    }
    ancestors.pop();
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Element {
        Element::new("body")
            .with_class("menu-hidden")
            .with_child(
                Element::new("div")
                    .with_class("slide-menu")
                    .with_class("menu")
                    .with_child(Element::new("ul").with_class("feed-list")),
            )
            .with_child(
                Element::new("div")
                    .with_class("feed")
                    .with_child(Element::new("article").with_class("entry"))
                    .with_child(Element::new("article").with_class("entry")),
            )
    }

    #[test]
    fn parses_class_chains() {
        let selector = Selector::parse(" .menu-hidden   .menu ").expect("selector should parse");
        assert_eq!(selector, Selector { classes: vec!["menu-hidden".into(), "menu".into()] });
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert_eq!(
            Selector::parse(".feed > .entry"),
            Err(SelectorError::Unsupported(">".to_string()))
        );
        assert!(Selector::parse("div").is_err());
        assert!(Selector::parse(".").is_err());
    }

    #[test]
    fn descendant_selector_requires_ancestor_class() {
        let mut body = page();
        let hidden_menu = Selector::parse(".menu-hidden .menu").expect("selector should parse");
        assert_eq!(body.count(&hidden_menu), 1);

        body.toggle_class("menu-hidden");
        assert_eq!(body.count(&hidden_menu), 0);
        assert_eq!(body.count(&Selector::class("menu")), 1);
    }

    #[test]
    fn ancestors_may_be_skipped_between_parts() {
        let body = page();
        let entries = Selector::parse(".menu-hidden .entry").expect("selector should parse");
        assert_eq!(body.count(&entries), 2);
        let wrong_order = Selector::parse(".entry .feed").expect("selector should parse");
        assert_eq!(body.count(&wrong_order), 0);
    }

    #[test]
    fn toggle_class_reports_new_state() {
        let mut element = Element::new("div");
        assert!(element.toggle_class("open"));
        assert!(element.has_class("open"));
        assert!(!element.toggle_class("open"));
        assert!(!element.has_class("open"));
    }

    #[test]
    fn replace_children_discards_previous_content() {
        let mut feed = Element::new("div").with_class("feed").with_text("Loading");
        feed.push_child(Element::new("p").with_text("old"));
        feed.replace_children(vec![Element::new("p").with_text("new")]);

        assert_eq!(feed.inner_html(), "<p>new</p>");
    }

    #[test]
    fn serializes_with_escaping() {
        let link = Element::new("a")
            .with_class("entry-link")
            .with_attr("href", "https://example.com/?a=1&b=\"2\"")
            .with_text("Fish & <Chips>");

        assert_eq!(
            link.outer_html(),
            "<a class=\"entry-link\" href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\">Fish &amp; &lt;Chips&gt;</a>"
        );
    }

    #[test]
    fn set_attr_overwrites_existing_value() {
        let mut link = Element::new("a").with_attr("data-id", "1");
        link.set_attr("data-id", "2");
        assert_eq!(link.attr("data-id"), Some("2"));
        assert_eq!(link.outer_html(), "<a data-id=\"2\"></a>");
    }
}
