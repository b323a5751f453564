use pmoconfig::get_config;
use tracing::Level;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Installs the global subscriber from `host.logger`
///
/// The minimum level comes from `host.logger.min_level` (TRACE when invalid),
/// console output from `host.logger.enable_console`.
pub fn init_logging() {
    let config = get_config();

    let log_level = match config.get_log_min_level() {
        Ok(l) => match string_to_level(&l) {
            Some(lev) => LevelFilter::from_level(lev),
            None => LevelFilter::TRACE,
        },
        Err(_) => LevelFilter::TRACE,
    };

    let subscriber = Registry::default().with(log_level);

    let enable_console = config.get_log_enable_console().unwrap_or(true);

    if enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .init();
    } else {
        subscriber.init();
    }
}

pub(crate) fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" | "WARNING" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}
