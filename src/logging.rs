use flexi_logger::{Logger, LoggerHandle};

/// Starts stderr logging for the daemon.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it stops the logger. Level defaults to `info` and can be
/// overridden through `RUST_LOG`.
pub fn init() -> Option<LoggerHandle> {
    match Logger::try_with_env_or_str("info") {
        Ok(logger) => match logger.log_to_stderr().start() {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("logger start failed: {e}");
                None
            }
        },
        Err(e) => {
            eprintln!("invalid log spec: {e}");
            None
        }
    }
}
