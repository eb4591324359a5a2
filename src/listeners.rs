//! Callback registry for single-threaded, cooperative dispatch.
//!
//! Both the environment signal sources and the resolver's rendering-layer
//! notifications are built on [`Listeners`]. Registration hands back a
//! [`Subscription`] whose drop releases the callback, so a listener lives
//! exactly as long as its owner keeps the handle.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Box<dyn FnMut(T)>;

struct Slot<T> {
    id: u64,
    // `None` while the callback is running.
    callback: Option<Callback<T>>,
}

struct Registry<T> {
    next_id: u64,
    slots: Vec<Slot<T>>,
    dispatching: bool,
    // Values emitted while a dispatch pass is running.
    pending: VecDeque<T>,
}

/// An ordered set of callbacks receiving values of type `T`.
///
/// Callbacks may subscribe, unsubscribe, or trigger another emit while they
/// are being called. A nested emit is queued and delivered after the current
/// pass finishes, so every callback sees values in the order they were
/// emitted and the last value it sees is the last one emitted.
pub struct Listeners<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: Clone + 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                slots: Vec::new(),
                dispatching: false,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Registers `callback`, returning the handle that keeps it registered.
    pub fn add<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(T) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.slots.push(Slot {
                id,
                callback: Some(Box::new(callback)),
            });
            id
        };

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                let removed = {
                    let mut registry = registry.borrow_mut();
                    let index = registry.slots.iter().position(|slot| slot.id == id);
                    index.map(|index| registry.slots.remove(index))
                };
                // Dropped outside the borrow: the callback may own subscriptions
                // to this same registry.
                drop(removed);
            }
        })
    }

    /// Delivers `value` to every callback, in registration order.
    ///
    /// Called from inside a callback, the value is queued behind the pass in
    /// progress and this returns immediately.
    pub fn emit(&self, value: T) {
        {
            let mut registry = self.registry.borrow_mut();
            registry.pending.push_back(value);
            if registry.dispatching {
                return;
            }
            registry.dispatching = true;
        }
        let _guard = DispatchGuard {
            registry: &self.registry,
        };

        loop {
            let next = self.registry.borrow_mut().pending.pop_front();
            let Some(value) = next else {
                break;
            };
            self.dispatch(value);
        }
    }

    /// One pass over the callbacks registered when the pass starts.
    fn dispatch(&self, value: T) {
        let ids: Vec<u64> = self
            .registry
            .borrow()
            .slots
            .iter()
            .map(|slot| slot.id)
            .collect();

        for id in ids {
            let taken = {
                let mut registry = self.registry.borrow_mut();
                registry
                    .slots
                    .iter_mut()
                    .find(|slot| slot.id == id)
                    .and_then(|slot| slot.callback.take())
            };
            let Some(mut callback) = taken else {
                continue;
            };

            callback(value.clone());

            let orphaned = {
                let mut registry = self.registry.borrow_mut();
                match registry.slots.iter_mut().find(|slot| slot.id == id) {
                    Some(slot) => {
                        slot.callback = Some(callback);
                        None
                    }
                    // Unsubscribed from inside its own call.
                    None => Some(callback),
                }
            };
            drop(orphaned);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.registry.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Clears the dispatching flag even if a callback panics.
struct DispatchGuard<'a, T> {
    registry: &'a RefCell<Registry<T>>,
}

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.try_borrow_mut() {
            registry.dispatching = false;
            registry.pending.clear();
        }
    }
}

impl<T: Clone + 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .registry
            .try_borrow()
            .map(|registry| registry.slots.len())
            .ok();
        f.debug_struct("Listeners").field("count", &count).finish()
    }
}

/// Keeps a callback registered until dropped.
///
/// Releasing after the source itself has gone away is a no-op.
#[must_use = "dropping a Subscription unregisters the callback immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new<F>(release: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription that was never attached to anything.
    pub fn inert() -> Self {
        Self { release: None }
    }

    /// Releases the callback now rather than at drop.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_all_in_order() {
        let listeners = Listeners::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = {
            let seen = Rc::clone(&seen);
            listeners.add(move |v| seen.borrow_mut().push(("a", v)))
        };
        let b = {
            let seen = Rc::clone(&seen);
            listeners.add(move |v| seen.borrow_mut().push(("b", v)))
        };

        listeners.emit(7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let listeners = Listeners::<u32>::new();
        let hits = Rc::new(Cell::new(0));

        let sub = {
            let hits = Rc::clone(&hits);
            listeners.add(move |_| hits.set(hits.get() + 1))
        };
        listeners.emit(1);
        drop(sub);
        listeners.emit(2);

        assert_eq!(hits.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let listeners = Listeners::<u32>::new();
        let sub = listeners.add(|_| {});
        assert_eq!(listeners.len(), 1);
        sub.unsubscribe();
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_subscription_outliving_registry_is_harmless() {
        let listeners = Listeners::<u32>::new();
        let sub = listeners.add(|_| {});
        drop(listeners);
        drop(sub);
    }

    #[test]
    fn test_inert_subscription() {
        let sub = Subscription::inert();
        assert!(format!("{:?}", sub).contains("false"));
        sub.unsubscribe();
    }

    #[test]
    fn test_callback_can_unsubscribe_itself() {
        let listeners = Listeners::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let holder: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let sub = {
            let hits = Rc::clone(&hits);
            let holder = Rc::clone(&holder);
            listeners.add(move |_| {
                hits.set(hits.get() + 1);
                holder.borrow_mut().take();
            })
        };
        *holder.borrow_mut() = Some(sub);

        listeners.emit(1);
        listeners.emit(2);
        assert_eq!(hits.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_callback_added_during_emit_waits_for_next_emit() {
        let listeners = Rc::new(Listeners::<u32>::new());
        let late_hits = Rc::new(Cell::new(0));
        let late_subs: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let _first = {
            let inner = Rc::clone(&listeners);
            let late_hits = Rc::clone(&late_hits);
            let late_subs = Rc::clone(&late_subs);
            listeners.add(move |_| {
                if late_subs.borrow().is_empty() {
                    let late_hits = Rc::clone(&late_hits);
                    let sub = inner.add(move |_| late_hits.set(late_hits.get() + 1));
                    late_subs.borrow_mut().push(sub);
                }
            })
        };

        listeners.emit(1);
        assert_eq!(late_hits.get(), 0);
        listeners.emit(2);
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn test_nested_emit_is_queued_behind_current_pass() {
        let listeners = Rc::new(Listeners::<u32>::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        let _first = {
            let inner = Rc::clone(&listeners);
            let order = Rc::clone(&order);
            listeners.add(move |v| {
                order.borrow_mut().push(("first", v));
                if v == 0 {
                    inner.emit(1);
                }
            })
        };
        let _second = {
            let order = Rc::clone(&order);
            listeners.add(move |v| order.borrow_mut().push(("second", v)))
        };

        listeners.emit(0);
        assert_eq!(
            *order.borrow(),
            vec![("first", 0), ("second", 0), ("first", 1), ("second", 1)]
        );
    }

    #[test]
    fn test_emit_after_nested_dispatch_still_delivers() {
        let listeners = Rc::new(Listeners::<u32>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _echo = {
            let inner = Rc::clone(&listeners);
            listeners.add(move |v| {
                if v == 0 {
                    inner.emit(1);
                }
            })
        };
        let _record = {
            let seen = Rc::clone(&seen);
            listeners.add(move |v| seen.borrow_mut().push(v))
        };

        listeners.emit(0);
        listeners.emit(2);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }
}
