//! Subscriber bookkeeping shared by the result and diagnostic hubs.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use tracing::warn;

use crate::frame_pipeline::common::error::{ObserverFailure, ObserverResult};
use crate::frame_pipeline::common::panic::panic_message;
use crate::frame_pipeline::dispatch::ObserverId;

/// Outcome of one publish call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishReport {
    /// Observers whose callback returned successfully
    pub delivered: usize,
    /// Observers whose callback returned an error or panicked
    pub failures: Vec<ObserverFailure>,
}

impl PublishReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

struct Entry<O: ?Sized> {
    id: ObserverId,
    observer: Weak<O>,
}

/// Ordered set of non-owning observer handles.
///
/// Publishing works on a snapshot taken under the read lock, so subscriptions changing
/// mid-publish only affect later publishes. Observers are never invoked while a lock is held.
pub(crate) struct Registry<O: ?Sized> {
    next_id: AtomicU64,
    entries: RwLock<Vec<Entry<O>>>,
}

impl<O: ?Sized> Registry<O> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe(&self, observer: Weak<O>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Entry { id, observer });
        id
    }

    pub(crate) fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Live observers in subscription order. Entries whose observer was dropped are pruned.
    pub(crate) fn snapshot(&self) -> Vec<Arc<O>> {
        let (live, has_dead) = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            let live: Vec<Arc<O>> = entries.iter().filter_map(|e| e.observer.upgrade()).collect();
            let has_dead = live.len() != entries.len();
            (live, has_dead)
        };

        if has_dead {
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|e| e.observer.strong_count() > 0);
        }

        live
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.observer.strong_count() > 0)
            .count()
    }

    /// Invokes `notify` on every observer of a fresh snapshot, isolating failures.
    pub(crate) fn publish_with<N, F>(&self, name_of: N, notify: F) -> PublishReport
    where
        N: Fn(&O) -> String,
        F: Fn(&O) -> ObserverResult,
    {
        let mut report = PublishReport::default();

        for observer in self.snapshot() {
            match deliver(|| notify(&*observer)) {
                Ok(()) => report.delivered += 1,
                Err(cause) => {
                    let name = name_of(&*observer);
                    warn!(observer = %name, cause = %cause, "Observer failed, continuing delivery");
                    report.failures.push(ObserverFailure {
                        observer: name,
                        cause,
                    });
                }
            }
        }

        report
    }
}

fn deliver<F>(callback: F) -> Result<(), String>
where
    F: FnOnce() -> ObserverResult,
{
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}
