use std::sync::{Arc, Weak};

use tracing::trace;

use crate::frame_pipeline::dispatch::registry::{PublishReport, Registry};
use crate::frame_pipeline::dispatch::{ObserverId, ResultObserver};
use crate::frame_pipeline::interpretation::InterpretationResult;

/// Fans interpretation results out to subscribed observers.
///
/// Holds only weak references: an observer dropped by its owner silently leaves the
/// subscriber list.
pub struct ResultDispatcher {
    registry: Registry<dyn ResultObserver>,
}

impl Default for ResultDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultDispatcher {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    pub fn subscribe<T: ResultObserver + 'static>(&self, observer: &Arc<T>) -> ObserverId {
        let weak: Weak<T> = Arc::downgrade(observer);
        let weak: Weak<dyn ResultObserver> = weak;
        self.registry.subscribe(weak)
    }

    pub fn subscribe_dyn(&self, observer: &Arc<dyn ResultObserver>) -> ObserverId {
        self.registry.subscribe(Arc::downgrade(observer))
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.registry.unsubscribe(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `result` to every observer subscribed when the call starts, in subscription
    /// order. A failing observer is recorded in the report and does not stop delivery.
    pub fn publish(&self, result: &InterpretationResult) -> PublishReport {
        let report = self.registry.publish_with(
            |o| o.name().to_string(),
            |o| o.on_result(result),
        );
        trace!(delivered = report.delivered, failed = report.failures.len(), "Published result");
        report
    }
}
