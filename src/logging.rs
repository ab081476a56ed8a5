use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
///
/// Dashboard output goes to stdout (or the alternate screen), so the stderr
/// layer stays quiet unless asked otherwise.
///
/// # Arguments
/// * `verbose` - Enable verbose (DEBUG) logging
/// * `log_file` - Optional path to log file. If None, logs only to stderr
pub fn init(verbose: bool, log_file: Option<PathBuf>) {
    // RUST_LOG takes precedence over the verbose flag
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gitglance={}", default_level)));

    // stdout belongs to the dashboard, diagnostics go to stderr
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false) // Module paths are noise at this size
        .compact(); // One line per event

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    // Optional file sink alongside stderr
    if let Some(log_path) = log_file {
        // Create the log directory on first use
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        // Rotated daily, named after the requested file
        let file_appender = tracing_appender::rolling::daily(
            log_path
                .parent()
                .unwrap_or_else(|| std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("gitglance.log")),
        );

        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false) // Plain text in files
            .json(); // Structured events for later grepping

        // try_init: tests and embedders may already own the global subscriber
        let _ = subscriber.with(file_layer).try_init();
    } else {
        let _ = subscriber.try_init();
    }
}
