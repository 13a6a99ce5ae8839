//! Write notifications.

use std::sync::{PoisonError, RwLock, Weak};

use crate::traits::KvStore;

/// Receives the outcome of every guarded write.
///
/// Each store holds at most one observer, by weak reference. Notifications
/// are fired synchronously on the writing thread and never affect the
/// status returned to the caller.
pub trait StoreObserver: Send + Sync {
    /// A tuple was stored.
    fn did_store_tuple(&self, store: &dyn KvStore);

    /// Storing a tuple failed in the engine.
    fn did_fail_to_store_tuple(&self, store: &dyn KvStore);
}

/// A store's observer registration.
#[derive(Default)]
pub(crate) struct ObserverSlot {
    inner: RwLock<Option<Weak<dyn StoreObserver>>>,
}

impl ObserverSlot {
    pub(crate) fn set(&self, observer: Weak<dyn StoreObserver>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(observer);
    }

    pub(crate) fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn current(&self) -> Option<std::sync::Arc<dyn StoreObserver>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(Weak::upgrade)
    }

    pub(crate) fn notify_stored(&self, store: &dyn KvStore) {
        if let Some(observer) = self.current() {
            observer.did_store_tuple(store);
        }
    }

    pub(crate) fn notify_failed(&self, store: &dyn KvStore) {
        if let Some(observer) = self.current() {
            observer.did_fail_to_store_tuple(store);
        }
    }
}

impl std::fmt::Debug for ObserverSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSlot")
            .field("registered", &self.current().is_some())
            .finish()
    }
}
