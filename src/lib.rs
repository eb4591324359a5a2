//! # Theme Switch - Light/dark theme resolution for application shells
//!
//! `theme-switch` owns the one piece of state a light/dark toggle needs: the
//! current [`Theme`], whether the user chose it explicitly, and how it is kept
//! in sync with persisted preferences and the host's color scheme.
//!
//! ## Core Concepts
//!
//! - [`ThemeResolver`]: per-session state machine (toggle, explicit choice,
//!   environment tracking)
//! - [`PreferenceStore`]: where an explicit choice is persisted ([`FileStore`],
//!   [`MemoryStore`])
//! - [`EnvironmentSignal`]: the host's "prefers dark" reading and its changes
//!   ([`OsSignal`], [`ManualSignal`])
//! - [`ThemeSurface`]: root element receiving the theme class ([`RootClasses`])
//! - [`ThemeConfig`]: storage key, fallback, and class labels
//!
//! ## Resolution
//!
//! At startup a stored `"light"`/`"dark"` record wins and marks the theme as
//! user-chosen. Otherwise the environment decides and keeps deciding until
//! the user toggles. If neither can answer, the configured fallback
//! ([`Theme::Light`] by default) is used. None of this ever fails: missing
//! collaborators degrade quietly and are reported through the `log` facade.
//!
//! ## Quick Start
//!
//! ```rust
//! use theme_switch::{ManualSignal, MemoryStore, RootClasses, Theme, ThemeResolver};
//!
//! let root = RootClasses::new();
//! let resolver = ThemeResolver::builder()
//!     .store(MemoryStore::new())
//!     .signal(ManualSignal::new(true))
//!     .surface(root.clone())
//!     .build();
//!
//! assert_eq!(resolver.theme(), Theme::Dark);
//! assert!(root.contains("dark"));
//!
//! let _redraw = resolver.subscribe(|theme| println!("now {}", theme));
//! resolver.toggle();
//! assert!(root.contains("light"));
//! ```
//!
//! ## Threading
//!
//! Everything here is single-threaded: callbacks run on the thread that
//! triggers them, and the types are `!Send`. Hosts with an event
//! loop call [`OsSignal::poll`] from it, or feed their own toolkit events to
//! [`ManualSignal::set_dark`].

mod config;
mod error;
mod listeners;
mod resolver;
mod signal;
mod store;
mod surface;
mod theme;

pub use config::{ThemeConfig, DEFAULT_STORAGE_KEY};
pub use error::{SignalError, StoreError};
pub use listeners::{Listeners, Subscription};
pub use resolver::{ResolverState, ThemeHandle, ThemeResolver, ThemeResolverBuilder, ThemeSource};
pub use signal::{
    set_scheme_detector, EnvironmentSignal, ManualSignal, OsSignal, SchemeDetector,
    SignalCallback, UnavailableSignal,
};
pub use store::{FileStore, MemoryStore, PreferenceStore, UnavailableStore};
pub use surface::{NoSurface, RootClasses, ThemeSurface};
pub use theme::{ParseThemeError, Theme};
