//! Builder wiring a [`ThemeResolver`] to its collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{ResolverState, Shared, ThemeResolver, ThemeSource};
use crate::config::ThemeConfig;
use crate::listeners::Listeners;
use crate::signal::{EnvironmentSignal, UnavailableSignal};
use crate::store::{PreferenceStore, UnavailableStore};
use crate::surface::{NoSurface, ThemeSurface};
use crate::theme::Theme;

/// Builder for [`ThemeResolver`].
///
/// Every collaborator is optional. A missing store or signal behaves as an
/// unavailable one, and a missing surface discards class writes.
pub struct ThemeResolverBuilder {
    config: ThemeConfig,
    store: Box<dyn PreferenceStore>,
    signal: Box<dyn EnvironmentSignal>,
    surface: Box<dyn ThemeSurface>,
}

impl ThemeResolverBuilder {
    pub fn new() -> Self {
        Self {
            config: ThemeConfig::default(),
            store: Box::new(UnavailableStore),
            signal: Box::new(UnavailableSignal),
            surface: Box::new(NoSurface),
        }
    }

    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the store holding the preference record.
    pub fn store<S: PreferenceStore + 'static>(mut self, store: S) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Sets the environment color scheme source.
    pub fn signal<S: EnvironmentSignal + 'static>(mut self, signal: S) -> Self {
        self.signal = Box::new(signal);
        self
    }

    /// Sets the root surface receiving theme class labels.
    pub fn surface<S: ThemeSurface + 'static>(mut self, surface: S) -> Self {
        self.surface = Box::new(surface);
        self
    }

    /// Resolves the initial theme, applies it to the surface, and starts
    /// following the environment when no stored choice exists.
    ///
    /// Never fails: unavailable collaborators degrade to the configured
    /// fallback theme.
    pub fn build(self) -> ThemeResolver {
        let (state, source) = resolve_initial(&self.config, &*self.store, &*self.signal);
        log::info!("resolved theme {} from {}", state.theme, source);

        let shared = Rc::new(Shared {
            config: self.config,
            state: Cell::new(state),
            store: RefCell::new(self.store),
            surface: RefCell::new(self.surface),
            listeners: Listeners::new(),
        });
        shared.apply(state.theme);

        let signal_subscription = (source == ThemeSource::Environment).then(|| {
            let weak = Rc::downgrade(&shared);
            self.signal.subscribe(Box::new(move |is_dark| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_signal(is_dark);
                }
            }))
        });

        ThemeResolver {
            shared,
            source,
            signal_subscription,
            _signal: self.signal,
        }
    }
}

impl Default for ThemeResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the starting theme: a valid stored choice wins, then the
/// environment, then the configured fallback.
fn resolve_initial(
    config: &ThemeConfig,
    store: &dyn PreferenceStore,
    signal: &dyn EnvironmentSignal,
) -> (ResolverState, ThemeSource) {
    match store.get(&config.storage_key) {
        Ok(Some(raw)) => match raw.parse::<Theme>() {
            Ok(theme) => {
                let state = ResolverState {
                    theme,
                    overridden: true,
                };
                return (state, ThemeSource::Stored);
            }
            Err(e) => log::warn!("ignoring stored theme preference: {}", e),
        },
        Ok(None) => {}
        Err(e) => log::warn!("theme preference unavailable: {}", e),
    }

    let (theme, source) = match signal.current_is_dark() {
        Ok(is_dark) => (Theme::from_is_dark(is_dark), ThemeSource::Environment),
        Err(e) => {
            log::warn!("{}; using {} theme", e, config.fallback);
            (config.fallback, ThemeSource::Fallback)
        }
    };
    let state = ResolverState {
        theme,
        overridden: false,
    };
    (state, source)
}
