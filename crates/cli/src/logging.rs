//! Tracing subscriber setup for the command line.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log level or a full filter spec.
pub const LOG_ENV: &str = "PATHTYPES_LOG";

const CORE_CRATE: &str = "pathtypes_core";

/// Install the stderr fmt subscriber.
///
/// `PATHTYPES_LOG` controls the level: "trace", "debug", "info", "warn",
/// "error", or a full filter spec like "pathtypes_core=debug".
pub fn init_tracing() {
    let filter = filter_spec(std::env::var(LOG_ENV).ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn filter_spec(value: Option<&str>) -> String {
    let crate_root = env!("CARGO_CRATE_NAME");
    match value {
        Some(level) if is_plain_level(level) => {
            format!("{crate_root}={level},{CORE_CRATE}={level}")
        }
        Some(spec) => spec.to_string(),
        None => format!("{crate_root}=info,{CORE_CRATE}=info"),
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
