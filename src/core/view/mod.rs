pub mod document;
pub mod dom;
pub mod render;

/// Text of the node rendered in place of entries when a feed cannot be shown.
pub const ERROR_MESSAGE: &str = "Sorry, this feed could not be loaded.";

/// Class names the reader's page is addressed by.
pub mod classes {
    pub const MENU_HIDDEN: &str = "menu-hidden";
    pub const MENU: &str = "menu";
    pub const SLIDE_MENU: &str = "slide-menu";
    pub const MENU_ICON_LINK: &str = "menu-icon-link";
    pub const HEADER: &str = "header";
    pub const HEADER_TITLE: &str = "header-title";
    pub const FEED_LIST: &str = "feed-list";
    pub const FEED_LINK: &str = "feed-link";
    pub const FEED: &str = "feed";
    pub const ENTRY: &str = "entry";
    pub const ENTRY_LINK: &str = "entry-link";
    pub const ERROR_MESSAGE: &str = "error-message";
}
