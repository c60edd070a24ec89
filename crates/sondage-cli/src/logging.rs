use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Where log events go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// Logs are dropped; used by the dashboard when no log file is configured.
    Discard,
}

impl LogTarget {
    /// A configured log file wins; otherwise only headless commands log to stderr.
    #[must_use]
    pub fn for_mode(is_dashboard: bool, log_file: Option<&Path>) -> Self {
        match (is_dashboard, log_file) {
            (_, Some(path)) => Self::File(path.to_owned()),
            (true, None) => Self::Discard,
            (false, None) => Self::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `info`.
pub fn init(target: &LogTarget) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    let result = match target {
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Discard => builder.with_writer(io::sink).try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))
}
