//! Observer registry shared by collection and preference stores.
//!
//! # Invariants
//! - Observers run synchronously, in registration order.
//! - Fan-out iterates over a snapshot of the registry, so an observer may
//!   unsubscribe (itself or others) without deadlocking; the change applies
//!   from the next notification.
//! - A `Subscription` outliving its store is inert.

use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Callback invoked with the store state after every change.
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T: ?Sized> {
    next_id: u64,
    observers: Vec<(u64, Observer<T>)>,
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64) -> bool;
    fn contains(&self, id: u64) -> bool;
}

impl<T: ?Sized + 'static> Detach for Mutex<Registry<T>> {
    fn detach(&self, id: u64) -> bool {
        let mut registry = self.lock().unwrap_or_else(PoisonError::into_inner);
        let before = registry.observers.len();
        registry.observers.retain(|(current, _)| *current != id);
        registry.observers.len() != before
    }

    fn contains(&self, id: u64) -> bool {
        let registry = self.lock().unwrap_or_else(PoisonError::into_inner);
        registry.observers.iter().any(|(current, _)| *current == id)
    }
}

/// Ordered set of observers for one store.
pub struct Subscribers<T: ?Sized> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: ?Sized + 'static> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }
}

impl<T: ?Sized + 'static> Subscribers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` at the end of the notification order.
    pub fn add(&self, observer: Observer<T>) -> Subscription {
        let id = {
            let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.observers.push((id, observer));
            id
        };
        let registry: Arc<dyn Detach> = self.registry.clone();
        Subscription {
            id,
            registry: Arc::downgrade(&registry),
        }
    }

    /// Invokes every registered observer with `state`.
    pub fn notify(&self, state: &T) {
        let observers = {
            let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect::<Vec<_>>()
        };
        for observer in observers {
            observer(state);
        }
    }

    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .observers
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Capability to deregister one observer.
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    /// Removes the observer. Returns `false` when it was already gone or the
    /// store no longer exists.
    pub fn unsubscribe(self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.detach(self.id))
    }

    /// Whether the observer is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Subscribers;
    use std::sync::{Arc, Mutex};

    #[test]
    fn observers_run_in_registration_order() {
        let subscribers = Subscribers::<u32>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            let _ = subscribers.add(Arc::new(move |value: &u32| {
                seen.lock().expect("lock").push(format!("{tag}:{value}"));
            }));
        }

        subscribers.notify(&7);

        assert_eq!(
            *seen.lock().expect("lock"),
            vec!["first:7", "second:7", "third:7"]
        );
    }

    #[test]
    fn unsubscribe_is_one_shot() {
        let subscribers = Subscribers::<u32>::new();
        let first = subscribers.add(Arc::new(|_: &u32| {}));
        let second = subscribers.add(Arc::new(|_: &u32| {}));
        assert!(first.is_active());
        assert_eq!(subscribers.len(), 2);

        assert!(first.unsubscribe());
        assert_eq!(subscribers.len(), 1);
        assert!(second.is_active());
    }

    #[test]
    fn subscription_outliving_registry_is_inert() {
        let subscribers = Subscribers::<u32>::new();
        let subscription = subscribers.add(Arc::new(|_: &u32| {}));
        drop(subscribers);

        assert!(!subscription.is_active());
        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn observer_can_unsubscribe_itself_during_fan_out() {
        let subscribers = Arc::new(Subscribers::<u32>::new());
        let slot = Arc::new(Mutex::new(None));
        let calls = Arc::new(Mutex::new(0_u32));

        let handle = {
            let slot = Arc::clone(&slot);
            let calls = Arc::clone(&calls);
            subscribers.add(Arc::new(move |_: &u32| {
                *calls.lock().expect("lock") += 1;
                if let Some(subscription) = slot.lock().expect("lock").take() {
                    let _ = super::Subscription::unsubscribe(subscription);
                }
            }))
        };
        *slot.lock().expect("lock") = Some(handle);

        subscribers.notify(&1);
        subscribers.notify(&2);

        assert_eq!(*calls.lock().expect("lock"), 1);
        assert!(subscribers.is_empty());
    }
}
