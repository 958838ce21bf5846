//! Log output setup for the `vogon` binary.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Environment variable selecting the log level.
pub const LOG_LEVEL_ENV: &str = "VOGON_LOG_LEVEL";
/// Environment variable switching to JSON output when non-empty.
pub const LOG_JSON_ENV: &str = "VOGON_LOG_JSON";

/// Level used when `$VOGON_LOG_LEVEL` is unset or empty.
const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Parse a `$VOGON_LOG_LEVEL` value (`trace`, `debug`, `info`, `warn`,
/// `error` or `off`, any case).
pub fn parse_level(value: Option<&str>) -> Result<LevelFilter, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(DEFAULT_LEVEL),
        Some(level) => match level.to_ascii_lowercase().as_str() {
            "trace" => Ok(LevelFilter::TRACE),
            "debug" => Ok(LevelFilter::DEBUG),
            "info" => Ok(LevelFilter::INFO),
            "warn" => Ok(LevelFilter::WARN),
            "error" => Ok(LevelFilter::ERROR),
            "off" => Ok(LevelFilter::OFF),
            _ => Err(format!("unknown log level {level:?}")),
        },
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Exits the process with status 1 if `$VOGON_LOG_LEVEL` is invalid.
pub fn init() {
    let level = std::env::var(LOG_LEVEL_ENV).ok();
    let level = match parse_level(level.as_deref()) {
        Ok(level) => level,
        Err(_) => {
            eprintln!("Invalid log level, check ${LOG_LEVEL_ENV}");
            std::process::exit(1);
        }
    };
    let filter = EnvFilter::default().add_directive(level.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = std::env::var(LOG_JSON_ENV).is_ok_and(|v| !v.is_empty());
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    tracing::debug!(%level, version = vogon_types::version::VERSION, "starting vogon");
}
