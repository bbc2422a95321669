//! Structured logging for Planetoid.
//!
//! Console output with uptime timestamps and module targets, plus an optional
//! JSON log file for post-mortem analysis. `RUST_LOG` wins over the configured
//! level, which wins over [`DEFAULT_FILTER`].

use planetoid_config::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "planetoid.log";

/// Pick the filter string from the config, falling back to [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => {
            // wgpu is chatty at info; keep it quiet unless the user names it.
            if config.debug.log_level.contains("wgpu") {
                config.debug.log_level.clone()
            } else {
                format!("{},wgpu=warn,naga=warn", config.debug.log_level)
            }
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Path of the JSON log file inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Initialize the global tracing subscriber.
///
/// File logging happens only when `log_dir` is given, the config enables it,
/// and the file can be created; otherwise console output alone is installed.
///
/// ```no_run
/// use planetoid_config::Config;
/// use planetoid_log::init_logging;
///
/// let config = Config::default();
/// init_logging(None, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let filter_str = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let file_logging = config.is_some_and(|c| c.debug.file_logging);
    if file_logging
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_file_path(log_dir))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}
