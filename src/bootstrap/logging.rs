use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

const STARTUP_LEVEL: &str = "info";

/// Filter of the installed subscriber, swappable once the config is read
pub struct LogLevel {
    handle: reload::Handle<EnvFilter, Registry>,
    /// Set when `RUST_LOG` chose the filter; the configured level is then ignored
    pinned: bool,
}

impl LogLevel {
    pub fn apply(&self, level: &str) {
        if self.pinned {
            return;
        }

        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    tracing::warn!("Failed to apply log level '{}': {}", level, e);
                }
            }
            Err(e) => tracing::warn!("Invalid logging.level '{}': {}", level, e),
        }
    }
}

fn startup_filter(rust_log: Option<&str>) -> (EnvFilter, bool) {
    match rust_log.map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, true),
        _ => (EnvFilter::new(STARTUP_LEVEL), false),
    }
}

/// Installs the global subscriber before anything else logs.
/// `RUST_LOG` wins over the level applied later from the config.
pub fn initialize() -> LogLevel {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, pinned) = startup_filter(rust_log.as_deref());
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    LogLevel { handle, pinned }
}
