use env_logger::{Builder, Env};

/// Environment variable holding the log filter, e.g. `debug` or
/// `slide_puzzle_engine::solver=debug`.
pub const LOG_ENV: &str = "SLIDE_PUZZLE_LOG";

/// Initialize logging with a filter taken from `SLIDE_PUZZLE_LOG`.
/// Defaults to `info`. Calling it twice is harmless.
pub fn init_logging() {
    let _ = Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .format_timestamp(None)
        .try_init();
}
