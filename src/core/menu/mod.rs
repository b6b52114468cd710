use crate::core::view::classes;
use crate::core::view::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Hidden,
    Visible,
}

/// Shows and hides the slide menu through the `menu-hidden` class on the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuController;

impl MenuController {
    pub fn state(&self, document: &Document) -> MenuState {
        if document.body().has_class(classes::MENU_HIDDEN) {
            MenuState::Hidden
        } else {
            MenuState::Visible
        }
    }

    pub fn toggle(&self, document: &mut Document) -> MenuState {
        let state = if document.body_mut().toggle_class(classes::MENU_HIDDEN) {
            MenuState::Hidden
        } else {
            MenuState::Visible
        };
        tracing::debug!(?state, "menu toggled");
        state
    }

    pub fn hide(&self, document: &mut Document) {
        document.body_mut().add_class(classes::MENU_HIDDEN);
    }
}
