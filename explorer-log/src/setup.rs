use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Crates of this workspace that log with the configured level.
///
/// All other crates are limited to [`Level::Info`].
const CRATE_NAMES: &[&str] = &[
    "explorer",
    "explorer_common",
    "explorer_config",
    "explorer_filter",
    "explorer_log",
];

/// Controls the log format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Auto detect the best format.
    ///
    /// This chooses [`LogFormat::Pretty`] for TTY, otherwise [`LogFormat::Simplified`].
    Auto,

    /// Pretty printing with colors.
    ///
    /// ```text
    ///   2024-01-10T12:10:32.123456Z DEBUG explorer_filter::reducer: resetting status not applicable to test
    /// ```
    Pretty,

    /// Simplified plain text output.
    ///
    /// ```text
    /// 2024-01-10T12:10:32.123456Z DEBUG explorer_filter::reducer: resetting status not applicable to test
    /// ```
    Simplified,

    /// Dump out JSON lines.
    ///
    /// ```text
    /// {"timestamp":"2024-01-10T12:10:32.123456Z","level":"DEBUG","message":"resetting status not applicable to test","target":"explorer_filter::reducer"}
    /// ```
    Json,
}

/// The maximum level of log messages emitted by the explorer crates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Disables logging entirely.
    Off,
    /// Only errors.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages and above.
    Info,
    /// Debugging messages and above.
    Debug,
    /// All messages.
    Trace,
}

impl Level {
    /// Returns the directive name of this level as understood by `RUST_LOG`.
    pub fn name(self) -> &'static str {
        match self {
            Level::Off => "off",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Off => LevelFilter::OFF,
            Level::Error => LevelFilter::ERROR,
            Level::Warn => LevelFilter::WARN,
            Level::Info => LevelFilter::INFO,
            Level::Debug => LevelFilter::DEBUG,
            Level::Trace => LevelFilter::TRACE,
        }
    }
}

/// Controls the logging system.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// The log level for the explorer crates.
    pub level: Level,

    /// Controls the log output format.
    ///
    /// Defaults to [`LogFormat::Auto`], which detects the best format based on the TTY.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: LogFormat::Auto,
        }
    }
}

/// Builds the default filter directives for the given level.
///
/// Third-party crates log at [`Level::Info`] at most, while all crates of this workspace use the
/// configured level.
fn default_directives(level: Level) -> String {
    let third_party = match level {
        Level::Off | Level::Error | Level::Warn => level,
        Level::Info | Level::Debug | Level::Trace => Level::Info,
    };

    let mut directives = third_party.name().to_owned();
    for name in CRATE_NAMES {
        directives.push(',');
        directives.push_str(name);
        directives.push('=');
        directives.push_str(level.name());
    }

    directives
}

/// Initialize the logging system.
///
/// If `RUST_LOG` is set, it takes precedence over the configured level. Log output is written to
/// `stderr`. Calling this function more than once has no effect.
///
/// # Example
///
/// ```
/// let log_config = explorer_log::LogConfig {
///     level: explorer_log::Level::Debug,
///     ..Default::default()
/// };
///
/// explorer_log::init(&log_config);
/// ```
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match (config.format, console::user_attended_stderr()) {
        (LogFormat::Auto, true) | (LogFormat::Pretty, _) => builder.pretty().try_init(),
        (LogFormat::Auto, false) | (LogFormat::Simplified, _) => {
            builder.with_ansi(false).try_init()
        }
        (LogFormat::Json, _) => builder
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .try_init(),
    };

    // A subscriber may already be installed, e.g. by a previous call or by the test harness.
    result.ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives(Level::Debug),
            "info,explorer=debug,explorer_common=debug,explorer_config=debug,\
             explorer_filter=debug,explorer_log=debug"
        );
    }

    #[test]
    fn test_quiet_levels_apply_to_third_party() {
        assert!(default_directives(Level::Warn).starts_with("warn,"));
        assert!(default_directives(Level::Off).starts_with("off,"));
    }

    #[test]
    fn test_config_defaults_from_empty() {
        let config: LogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.format, LogFormat::Auto);
    }

    #[test]
    fn test_config_lowercase_names() {
        let config: LogConfig =
            serde_json::from_str(r#"{"level":"trace","format":"json"}"#).unwrap();
        assert_eq!(config.level, Level::Trace);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(LevelFilter::from(config.level), LevelFilter::TRACE);
    }
}
