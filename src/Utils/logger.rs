use chrono::Local;
use log::info;
use simplelog::*;

/// Initializes terminal logging at the requested level. Levels "off" and
/// "none" disable logging entirely; a second call is a no-op because the
/// global logger can only be set once.
pub fn init_logging(loglevel: Option<String>) {
    let is_logging_disabled = loglevel
        .as_ref()
        .map(|level| level == "off" || level == "none")
        .unwrap_or(false);
    if is_logging_disabled {
        return;
    }
    let log_option = if let Some(level) = loglevel {
        match level.as_str() {
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => panic!("loglevel must be debug, info, warn or error"),
        }
    } else {
        LevelFilter::Info
    };
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    if logger_instance.is_ok() {
        info!(
            "logging started at {} with level {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            log_option
        );
    }
}
