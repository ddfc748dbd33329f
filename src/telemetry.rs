//! Tracing setup for the quiz backend.
//!
//! - LOG_LEVEL: an `EnvFilter` directive string. Unset or invalid falls back to
//!   `DEFAULT_FILTER`, which keeps the generation pipeline (`quiz` target) at debug.
//! - LOG_FORMAT: "json" for one JSON object per event, anything else for the
//!   human-readable format.
//!
//! Per-request spans come from the `TraceLayer` in `routes`.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,quiz=debug,readquiz_backend=debug,tower_http=info,axum=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Filter from `directives` when they parse, else the service default.
pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok();
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level.as_deref()))
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // The two builders have different types, so each branch installs its own.
    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if installed.is_ok() {
        tracing::debug!(target: "readquiz_backend", ?format, "Tracing initialized");
    }
}
