use crate::core::feed::fetcher::FeedFetcher;
use crate::core::feed::loader::{FeedLoader, LoadOutcome};
use crate::core::feed::registry::FeedRegistry;
use crate::core::menu::{MenuController, MenuState};
use crate::core::view::classes;
use crate::core::view::document::Document;
use crate::core::view::dom::{Element, Selector, SelectorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickAction {
    ToggleMenu,
    OpenFeed(i64),
}

/// The feed reader page: a feed container, a slide menu listing every feed
/// and the icon that opens it.
pub struct FeedReader<F> {
    loader: FeedLoader<F>,
    document: Document,
    menu: MenuController,
}

impl<F: FeedFetcher> FeedReader<F> {
    pub fn new(loader: FeedLoader<F>) -> Self {
        let document = Document::new(loader.registry());
        Self {
            loader,
            document,
            menu: MenuController,
        }
    }

    /// Shows the default feed.
    pub async fn init(&mut self) -> LoadOutcome {
        self.load_feed(0).await
    }

    pub async fn load_feed(&mut self, index: i64) -> LoadOutcome {
        self.loader.load(index, &mut self.document).await
    }

    pub async fn load_feed_with<C>(&mut self, index: i64, on_complete: C) -> LoadOutcome
    where
        C: FnOnce(&LoadOutcome, &Document),
    {
        self.loader
            .load_feed(index, &mut self.document, on_complete)
            .await
    }

    /// Clicks every element matching `selector`, in document order, and
    /// returns how many were clicked. The menu icon toggles the menu; a feed
    /// link closes the menu and loads its feed. Other elements ignore clicks.
    pub async fn click(&mut self, selector: &str) -> Result<usize, SelectorError> {
        let selector = Selector::parse(selector)?;
        let targets = self.document.body().select(&selector);
        let clicked = targets.len();
        let actions: Vec<ClickAction> = targets.into_iter().filter_map(click_action).collect();

        for action in actions {
            match action {
                ClickAction::ToggleMenu => {
                    self.menu.toggle(&mut self.document);
                }
                ClickAction::OpenFeed(index) => {
                    self.menu.hide(&mut self.document);
                    self.load_feed(index).await;
                }
            }
        }
        Ok(clicked)
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu.state(&self.document)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &FeedRegistry {
        self.loader.registry()
    }
}

fn click_action(element: &Element) -> Option<ClickAction> {
    if element.has_class(classes::MENU_ICON_LINK) {
        return Some(ClickAction::ToggleMenu);
    }
    if element.has_class(classes::FEED_LINK) {
        // A link without a usable id still loads, and shows the error state.
        let index = element
            .attr("data-id")
            .and_then(|id| id.parse().ok())
            .unwrap_or(-1);
        return Some(ClickAction::OpenFeed(index));
    }
    None
}
