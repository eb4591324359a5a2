//! Operating system color scheme detection.

use dark_light::{detect as detect_os_mode, Mode as OsMode};
use once_cell::sync::Lazy;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Mutex;

use super::{EnvironmentSignal, SignalCallback};
use crate::error::SignalError;
use crate::listeners::{Listeners, Subscription};
use crate::theme::Theme;

/// Function reporting the scheme the operating system currently prefers.
pub type SchemeDetector = fn() -> Theme;

static SCHEME_DETECTOR: Lazy<Mutex<SchemeDetector>> = Lazy::new(|| Mutex::new(os_scheme_detector));

/// Overrides the detector used by every [`OsSignal`] in the process.
///
/// This is useful for testing or when you want to force a specific scheme.
pub fn set_scheme_detector(detector: SchemeDetector) {
    let mut guard = SCHEME_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = detector;
}

fn detect_scheme() -> Theme {
    let detector = SCHEME_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    (*detector)()
}

fn os_scheme_detector() -> Theme {
    match detect_os_mode() {
        OsMode::Dark => Theme::Dark,
        OsMode::Light => Theme::Light,
    }
}

/// Environment signal backed by the operating system's appearance setting.
///
/// The OS offers no portable push notification, so changes are discovered by
/// [`poll`](OsSignal::poll), which the host calls from its own event loop.
/// Subscribers therefore run on the host's thread, never concurrently with
/// anything else. Clones share the last reading and subscribers.
///
/// # Example
///
/// ```rust
/// use theme_switch::{set_scheme_detector, EnvironmentSignal, OsSignal, Theme};
///
/// set_scheme_detector(|| Theme::Dark);
/// let signal = OsSignal::new();
/// assert_eq!(signal.current_is_dark(), Ok(true));
/// ```
#[derive(Debug, Clone)]
pub struct OsSignal {
    inner: Rc<Inner>,
}

#[derive(Debug)]
struct Inner {
    last_is_dark: Cell<bool>,
    listeners: Listeners<bool>,
}

impl OsSignal {
    /// Creates a signal seeded with the current OS reading.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                last_is_dark: Cell::new(detect_scheme().is_dark()),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Re-reads the OS scheme, notifying subscribers if it changed since the
    /// last reading. Returns whether a change was seen.
    pub fn poll(&self) -> bool {
        let is_dark = detect_scheme().is_dark();
        if self.inner.last_is_dark.replace(is_dark) == is_dark {
            return false;
        }
        log::debug!("os color scheme changed to {}", Theme::from_is_dark(is_dark));
        self.inner.listeners.emit(is_dark);
        true
    }
}

impl Default for OsSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentSignal for OsSignal {
    fn current_is_dark(&self) -> Result<bool, SignalError> {
        Ok(self.inner.last_is_dark.get())
    }

    fn subscribe(&self, callback: SignalCallback) -> Subscription {
        self.inner.listeners.add(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::cell::RefCell;

    #[test]
    #[serial]
    fn test_signal_uses_detector() {
        set_scheme_detector(|| Theme::Dark);
        assert_eq!(OsSignal::new().current_is_dark(), Ok(true));

        set_scheme_detector(|| Theme::Light);
        assert_eq!(OsSignal::new().current_is_dark(), Ok(false));
    }

    #[test]
    #[serial]
    fn test_poll_notifies_on_change_only() {
        set_scheme_detector(|| Theme::Light);
        let signal = OsSignal::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _sub = {
            let seen = Rc::clone(&seen);
            signal.subscribe(Box::new(move |dark| seen.borrow_mut().push(dark)))
        };

        assert!(!signal.poll());

        set_scheme_detector(|| Theme::Dark);
        assert!(signal.poll());
        assert!(!signal.poll());
        assert_eq!(signal.current_is_dark(), Ok(true));

        set_scheme_detector(|| Theme::Light);
        assert!(signal.poll());

        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
