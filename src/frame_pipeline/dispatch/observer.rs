use std::fmt;

use crate::frame_pipeline::common::error::ObserverResult;
use crate::frame_pipeline::dispatch::Diagnostic;
use crate::frame_pipeline::interpretation::InterpretationResult;

/// Handle returned on subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Consumer of interpretation results.
///
/// Called synchronously on the publishing thread. Observers that need a particular
/// context (a UI thread, for instance) forward the result there themselves.
pub trait ResultObserver: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn on_result(&self, result: &InterpretationResult) -> ObserverResult;
}

/// Consumer of per-frame failures reported by the facade.
pub trait DiagnosticObserver: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) -> ObserverResult;
}
