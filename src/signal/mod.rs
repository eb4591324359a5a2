//! Sources of the host's preferred color scheme.
//!
//! This module provides:
//!
//! - [`EnvironmentSignal`]: "is dark preferred?" plus change notifications
//! - [`ManualSignal`]: driven by the host, e.g. from a toolkit's own event
//! - [`OsSignal`]: backed by operating system detection, polled cooperatively
//! - [`UnavailableSignal`]: for contexts that cannot report a scheme

mod manual;
mod os;

pub use manual::ManualSignal;
pub use os::{set_scheme_detector, OsSignal, SchemeDetector};

use crate::error::SignalError;
use crate::listeners::Subscription;

/// Callback receiving the new "prefers dark" value.
pub type SignalCallback = Box<dyn FnMut(bool)>;

/// Reports whether the environment prefers a dark scheme and pushes changes.
pub trait EnvironmentSignal {
    /// Current "prefers dark" reading.
    fn current_is_dark(&self) -> Result<bool, SignalError>;

    /// Registers `callback` for future changes. The callback stays registered
    /// until the returned [`Subscription`] is dropped.
    fn subscribe(&self, callback: SignalCallback) -> Subscription;
}

/// A signal source that cannot answer and never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSignal;

impl EnvironmentSignal for UnavailableSignal {
    fn current_is_dark(&self) -> Result<bool, SignalError> {
        Err(SignalError::Unavailable)
    }

    fn subscribe(&self, _callback: SignalCallback) -> Subscription {
        Subscription::inert()
    }
}
