use std::cell::Cell;
use std::rc::Rc;

use super::{EnvironmentSignal, SignalCallback};
use crate::error::SignalError;
use crate::listeners::{Listeners, Subscription};

/// Environment signal fed by the host.
///
/// Useful when the embedding toolkit already delivers color scheme change
/// events. Clones share the same value and subscribers.
///
/// # Example
///
/// ```rust
/// use theme_switch::{EnvironmentSignal, ManualSignal};
///
/// let signal = ManualSignal::new(false);
/// let host = signal.clone();
/// host.set_dark(true);
/// assert_eq!(signal.current_is_dark(), Ok(true));
/// ```
#[derive(Debug, Clone)]
pub struct ManualSignal {
    inner: Rc<Inner>,
}

#[derive(Debug)]
struct Inner {
    is_dark: Cell<bool>,
    listeners: Listeners<bool>,
}

impl ManualSignal {
    pub fn new(is_dark: bool) -> Self {
        Self {
            inner: Rc::new(Inner {
                is_dark: Cell::new(is_dark),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Records a new reading and notifies subscribers if it changed.
    pub fn set_dark(&self, is_dark: bool) {
        if self.inner.is_dark.replace(is_dark) != is_dark {
            self.inner.listeners.emit(is_dark);
        }
    }

    /// Notifies subscribers with the current reading whether or not it changed.
    pub fn fire(&self) {
        self.inner.listeners.emit(self.inner.is_dark.get());
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl EnvironmentSignal for ManualSignal {
    fn current_is_dark(&self) -> Result<bool, SignalError> {
        Ok(self.inner.is_dark.get())
    }

    fn subscribe(&self, callback: SignalCallback) -> Subscription {
        self.inner.listeners.add(callback)
    }
}
