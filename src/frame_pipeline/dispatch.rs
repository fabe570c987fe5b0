//! Result dispatch module
//!
//! Publish/subscribe hubs that fan interpretation results and diagnostics out to
//! registered observers.

mod observer;
mod registry;
mod result_dispatcher;
mod diagnostics;
mod observers;


pub use observer::{DiagnosticObserver, ObserverId, ResultObserver};
pub use registry::PublishReport;
pub use result_dispatcher::ResultDispatcher;
pub use diagnostics::{Diagnostic, DiagnosticDispatcher};
pub use observers::{DisplayObserver, LogDiagnosticObserver, LogObserver};
