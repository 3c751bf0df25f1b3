use tracing_appender::non_blocking::WorkerGuard;

/// File that log lines are written to, in the working directory.
pub const LOG_FILE_NAME: &str = "fieldroad.log";

/// Install a global subscriber that writes to [`LOG_FILE_NAME`] instead of the terminal,
/// which the renderer owns while animating.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_file_logging(max_level: tracing::Level) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_thread_names(true)
        .with_max_level(max_level)
        .init();
    guard
}
