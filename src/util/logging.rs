use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: our own events plus the HTTP access log.
pub const DEFAULT_FILTER: &str = "reach_finns=info,tower_http=info,warn";

pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if json {
        // one object per line, span fields flattened for log shippers
        fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).compact().init();
    }
}
