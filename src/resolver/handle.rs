use std::fmt;
use std::rc::Weak;

use super::Shared;
use crate::listeners::Subscription;
use crate::theme::Theme;

/// Weak, cloneable access to a [`ThemeResolver`](super::ThemeResolver) for
/// views and event callbacks.
///
/// A handle does not keep the session alive. Once the resolver is dropped,
/// queries return `None` and actions do nothing.
#[derive(Clone)]
pub struct ThemeHandle {
    shared: Weak<Shared>,
}

impl ThemeHandle {
    pub(super) fn new(shared: Weak<Shared>) -> Self {
        Self { shared }
    }

    /// Current theme, or `None` if the session has ended.
    pub fn theme(&self) -> Option<Theme> {
        self.shared.upgrade().map(|shared| shared.state().theme)
    }

    /// Whether an explicit user choice is in effect, or `None` if the session
    /// has ended.
    pub fn is_overridden(&self) -> Option<bool> {
        self.shared.upgrade().map(|shared| shared.state().overridden)
    }

    /// Toggles the theme. Returns the new theme, or `None` if the session has
    /// ended.
    pub fn toggle(&self) -> Option<Theme> {
        self.shared.upgrade().map(|shared| shared.toggle())
    }

    /// Makes `theme` the user's explicit choice. Returns `false` if the
    /// session has ended.
    pub fn set_theme(&self, theme: Theme) -> bool {
        match self.shared.upgrade() {
            Some(shared) => {
                shared.choose(theme);
                true
            }
            None => false,
        }
    }

    /// Registers a rendering-layer callback, or returns an inert subscription
    /// if the session has ended.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Theme) + 'static,
    {
        match self.shared.upgrade() {
            Some(shared) => shared.listeners.add(callback),
            None => Subscription::inert(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl fmt::Debug for ThemeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeHandle")
            .field("theme", &self.theme())
            .finish()
    }
}
