use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber for the demo binary.
///
/// Library code only emits events; embedding applications are free to install their own
/// subscriber instead of calling this.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Like [`init`], with `default_filter` applied when `RUST_LOG` is unset or unparsable.
///
/// Once the filter enables debug, frame and stage spans are printed as they close, which
/// puts per-frame and per-stage latency on every line.
pub fn init_with_default(default_filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let span_events = match env_filter.max_level_hint() {
        Some(level) if level >= LevelFilter::DEBUG => FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_names(true)
        .with_timer(fmt::time::uptime())
        .with_span_events(span_events);

    // Several test binaries may race to install a subscriber; the first one wins.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
