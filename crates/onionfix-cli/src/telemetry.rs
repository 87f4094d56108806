use crate::config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes structured logging using `tracing-subscriber`.
///
/// Filtering follows `RUST_LOG` and defaults to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_timer(fmt::time::ChronoLocal::rfc_3339());

    match format {
        LogFormat::Pretty => builder.with_file(true).with_line_number(true).pretty().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().flatten_event(true).init(),
    }
}
