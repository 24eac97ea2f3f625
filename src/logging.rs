// SPDX-License-Identifier: MIT
//
// File logging, opt-in via `TILDE_LOG`.
//
// stdout and stderr belong to the terminal being drawn on, so log lines go
// to `<temp>/tilde/logs/tilde.log` (rolled daily) through a non-blocking
// writer. `TILDE_LOG` holds the filter directive, e.g. `TILDE_LOG=debug`
// or `TILDE_LOG=tilde_term=trace`. Unset means no subscriber at all.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TILDE_LOG";

/// Keeps the background log writer alive. Drop it last to flush.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Install the file subscriber if `TILDE_LOG` is set.
///
/// Returns `None` when logging is off or cannot be set up; the editor runs
/// the same either way.
pub fn init() -> Option<LoggingGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).ok()?;

    let log_dir: PathBuf = std::env::temp_dir().join("tilde").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "tilde.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}
