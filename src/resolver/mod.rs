//! Theme resolution, toggling, and persistence.
//!
//! This module provides:
//!
//! - [`ThemeResolver`]: the session-owned theme state machine
//! - [`ThemeResolverBuilder`]: wires collaborators and runs initial resolution
//! - [`ThemeHandle`]: weak, cloneable access for views
//! - [`ResolverState`] and [`ThemeSource`]: snapshots for inspection
//!
//! The state is a [`Theme`] plus an "overridden" flag. An explicit choice
//! (toggle or [`set_theme`](ThemeResolver::set_theme)) sets the flag and is
//! persisted. Environment changes only move the theme while the flag is clear.

mod builder;
mod handle;

pub use builder::ThemeResolverBuilder;
pub use handle::ThemeHandle;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::config::ThemeConfig;
use crate::listeners::{Listeners, Subscription};
use crate::signal::EnvironmentSignal;
use crate::store::PreferenceStore;
use crate::surface::ThemeSurface;
use crate::theme::Theme;

/// Snapshot of the resolver's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverState {
    pub theme: Theme,
    /// An explicit user choice exists; environment changes are ignored.
    pub overridden: bool,
}

/// Where the theme chosen at initialization came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// A valid preference record.
    Stored,
    /// The environment signal's current reading.
    Environment,
    /// Neither could answer; the configured fallback was used.
    Fallback,
}

impl fmt::Display for ThemeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeSource::Stored => "stored preference",
            ThemeSource::Environment => "environment",
            ThemeSource::Fallback => "fallback",
        })
    }
}

/// State shared between the resolver, its handles, and the signal callback.
pub(crate) struct Shared {
    config: ThemeConfig,
    state: Cell<ResolverState>,
    store: RefCell<Box<dyn PreferenceStore>>,
    surface: RefCell<Box<dyn ThemeSurface>>,
    listeners: Listeners<Theme>,
}

impl Shared {
    pub(crate) fn state(&self) -> ResolverState {
        self.state.get()
    }

    pub(crate) fn toggle(&self) -> Theme {
        let next = self.state.get().theme.toggled();
        self.choose(next);
        next
    }

    /// Records an explicit user choice.
    pub(crate) fn choose(&self, theme: Theme) {
        let previous = self.state.replace(ResolverState {
            theme,
            overridden: true,
        });
        self.persist(theme);
        if previous.theme != theme {
            log::debug!("theme set to {} by user", theme);
            self.apply(theme);
            self.listeners.emit(theme);
        }
    }

    pub(crate) fn on_signal(&self, is_dark: bool) {
        let current = self.state.get();
        if current.overridden {
            log::trace!("ignoring environment signal; theme is user-chosen");
            return;
        }
        let theme = Theme::from_is_dark(is_dark);
        if theme == current.theme {
            return;
        }
        self.state.set(ResolverState {
            theme,
            overridden: false,
        });
        log::debug!("theme set to {} by environment", theme);
        self.apply(theme);
        self.listeners.emit(theme);
    }

    fn persist(&self, theme: Theme) {
        let result = self
            .store
            .borrow_mut()
            .set(&self.config.storage_key, theme.as_str());
        if let Err(e) = result {
            log::warn!("could not persist theme preference: {}", e);
        }
    }

    fn apply(&self, theme: Theme) {
        let class = self.config.class_for(theme);
        let stale = self.config.class_for(theme.toggled());
        self.surface.borrow_mut().apply(class, stale);
    }
}

/// Owns the active theme for one application session.
///
/// Built with [`ThemeResolver::builder`], which resolves the initial theme
/// and applies it to the surface before returning. Views either borrow the
/// resolver or hold a [`ThemeHandle`]. Dropping the resolver (or calling
/// [`shutdown`](ThemeResolver::shutdown)) ends the session: the environment
/// subscription is released and outstanding handles go inert.
///
/// # Example
///
/// ```rust
/// use theme_switch::{ManualSignal, MemoryStore, PreferenceStore, Theme, ThemeResolver};
///
/// let store = MemoryStore::new();
/// let signal = ManualSignal::new(false);
/// let resolver = ThemeResolver::builder()
///     .store(store.clone())
///     .signal(signal.clone())
///     .build();
/// assert_eq!(resolver.theme(), Theme::Light);
///
/// // The environment drives the theme until the user picks one.
/// signal.set_dark(true);
/// assert_eq!(resolver.theme(), Theme::Dark);
///
/// resolver.toggle();
/// assert_eq!(resolver.theme(), Theme::Light);
/// assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
///
/// signal.set_dark(false);
/// signal.set_dark(true);
/// assert_eq!(resolver.theme(), Theme::Light);
/// ```
pub struct ThemeResolver {
    shared: Rc<Shared>,
    source: ThemeSource,
    // Released before the signal it points into.
    signal_subscription: Option<Subscription>,
    _signal: Box<dyn EnvironmentSignal>,
}

impl ThemeResolver {
    /// Creates a builder for wiring the resolver's collaborators.
    pub fn builder() -> ThemeResolverBuilder {
        ThemeResolverBuilder::new()
    }

    pub fn theme(&self) -> Theme {
        self.shared.state().theme
    }

    /// Whether an explicit user choice is in effect.
    pub fn is_overridden(&self) -> bool {
        self.shared.state().overridden
    }

    pub fn state(&self) -> ResolverState {
        self.shared.state()
    }

    /// Where the theme chosen at initialization came from.
    pub fn source(&self) -> ThemeSource {
        self.source
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.shared.config
    }

    /// Whether environment changes can still move the theme.
    pub fn is_following_environment(&self) -> bool {
        self.signal_subscription.is_some() && !self.is_overridden()
    }

    /// Flips the theme, marks it user-chosen, persists it, and notifies
    /// subscribers. Returns the new theme.
    pub fn toggle(&self) -> Theme {
        self.shared.toggle()
    }

    /// Makes `theme` the user's explicit choice.
    ///
    /// The choice is persisted even when it matches the current theme.
    /// Subscribers are notified only if the theme actually changes.
    pub fn set_theme(&self, theme: Theme) {
        self.shared.choose(theme)
    }

    /// Feeds an environment "prefers dark" reading to the resolver.
    ///
    /// Ignored once the user has chosen a theme. This is what the environment
    /// subscription calls; hosts delivering scheme changes themselves can
    /// call it directly.
    ///
    /// This path never writes the preference store. A stored record means the
    /// user chose explicitly, so environment-driven changes only update the
    /// surface and notify subscribers.
    pub fn on_environment_signal_changed(&self, is_dark: bool) {
        self.shared.on_signal(is_dark)
    }

    /// Registers a rendering-layer callback invoked with each new theme.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Theme) + 'static,
    {
        self.shared.listeners.add(callback)
    }

    /// Returns a weak handle for views.
    pub fn handle(&self) -> ThemeHandle {
        ThemeHandle::new(Rc::downgrade(&self.shared))
    }

    /// Ends the session.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for ThemeResolver {
    fn drop(&mut self) {
        if self.signal_subscription.take().is_some() {
            log::debug!("released environment signal subscription");
        }
    }
}

impl fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeResolver")
            .field("state", &self.shared.state())
            .field("source", &self.source)
            .field("config", &self.shared.config)
            .field("subscribed", &self.signal_subscription.is_some())
            .finish_non_exhaustive()
    }
}
