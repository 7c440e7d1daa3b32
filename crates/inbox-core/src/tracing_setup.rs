use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::constants::LOG_FILE_ENV;

pub fn init_tracing() {
    init_tracing_with_default("info");
}

/// Log to stderr filtered by `RUST_LOG` (falling back to `default_directive`).
/// When `INBOX_LOG_FILE` is set, DEBUG and above is also appended to that file.
pub fn init_tracing_with_default(default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    let registry = tracing_subscriber::registry().with(stderr_layer);

    let Some(log_path) = std::env::var(LOG_FILE_ENV).ok() else {
        let _ = registry.try_init();
        return;
    };

    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(LevelFilter::DEBUG);

            let _ = registry.with(file_layer).try_init();
            tracing::debug!("File logging enabled: {}", log_path);
        }
        Err(e) => {
            let _ = registry.try_init();
            tracing::warn!("Could not open log file {}: {}", log_path, e);
        }
    }
}
