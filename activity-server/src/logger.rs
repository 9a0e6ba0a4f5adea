//! Logging infrastructure

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `log_level`. Files roll daily under `log_dir` when
/// the directory exists; otherwise logs go to stdout.
pub fn init_logger(log_level: &str, json: bool, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "activity_server={log_level},gateway={log_level},tower_http={log_level}"
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file = log_dir
        .filter(|dir| Path::new(dir).exists())
        .map(|dir| tracing_appender::rolling::daily(dir, "activity-server"));

    match (json, file) {
        (true, Some(writer)) => builder.json().with_writer(writer).init(),
        (true, None) => builder.json().init(),
        (false, Some(writer)) => builder.with_ansi(false).with_writer(writer).init(),
        (false, None) => builder.init(),
    }
}
