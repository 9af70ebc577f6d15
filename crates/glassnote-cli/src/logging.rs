use glassnote_core::config::{ensure_config_dir, get_log_file_path};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `glassnote_core=debug`.
pub const LOG_ENV: &str = "GLASSNOTE_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// The log file in the config dir; used while the notepad owns the
    /// terminal.
    File,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_logging(target: LogTarget) {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File => {
            let file = ensure_config_dir().and_then(|_| {
                Ok(OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(get_log_file_path())?)
            });
            // Nothing may write to the terminal while the notepad runs
            if let Ok(file) = file {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .try_init();
            }
        }
    }
}
