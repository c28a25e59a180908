use crate::env::Environment;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Environment variable controlling the verbosity level.
pub const LOGGING_ENV: &str = "GOSPACE_VERBOSE";

/// Verbosity levels, from silent to everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    #[default]
    Off,
    /// unrecoverable errors
    Fatal,
    /// recoverable errors
    Error,
    /// potential problems
    Warn,
    /// general information
    Info,
    /// detailed information
    Debug,
    /// verbose information about the current state
    Trace,
}

impl Verbosity {
    const LEVELS: [Verbosity; 7] = [
        Verbosity::Off,
        Verbosity::Fatal,
        Verbosity::Error,
        Verbosity::Warn,
        Verbosity::Info,
        Verbosity::Debug,
        Verbosity::Trace,
    ];

    /// Convert a numeric level, clamped to the known range.
    pub fn from_level(value: i64) -> Self {
        let index = value.clamp(0, Self::LEVELS.len() as i64 - 1);
        Self::LEVELS[index as usize]
    }

    /// Numeric value of the level, 0 for [`Verbosity::Off`].
    pub fn level(self) -> i64 {
        self as i64
    }

    /// Raise (or lower, for negative `diff`) the level, clamped to the known range.
    pub fn increase(self, diff: i64) -> Self {
        Self::from_level(self.level().saturating_add(diff))
    }

    /// Case-insensitive name lookup. Unknown names are [`Verbosity::Off`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "trace" | "spam" => Verbosity::Trace,
            "debug" | "insight" => Verbosity::Debug,
            "info" | "information" | "informative" => Verbosity::Info,
            "warn" | "warning" => Verbosity::Warn,
            "err" | "error" => Verbosity::Error,
            "fatal" | "panic" => Verbosity::Fatal,
            _ => Verbosity::Off,
        }
    }

    /// `log` has no fatal level, fatal messages go out as errors.
    pub fn filter(self) -> LevelFilter {
        match self {
            Verbosity::Off => LevelFilter::Off,
            Verbosity::Fatal | Verbosity::Error => LevelFilter::Error,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for Verbosity {
    type Err = std::convert::Infallible;

    /// Accepts either a number or a level name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(level) => Verbosity::from_level(level),
            Err(_) => Verbosity::from_name(s),
        })
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verbosity::Off => "OFF",
            Verbosity::Fatal => "FATAL",
            Verbosity::Error => "ERROR",
            Verbosity::Warn => "WARN",
            Verbosity::Info => "INFO",
            Verbosity::Debug => "DEBUG",
            Verbosity::Trace => "TRACE",
        };
        f.write_str(name)
    }
}

/// Logging setup decided once at startup and installed with [`LogConfig::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub verbosity: Verbosity,
}

impl LogConfig {
    /// Each `-v` on the command line raises the level by this amount.
    pub const STEP: i64 = 2;

    /// Read [`LOGGING_ENV`] from the snapshot. Unset or empty means off.
    pub fn from_env(env: &Environment) -> Self {
        let verbosity = env
            .get_var(LOGGING_ENV)
            .filter(|value| !value.trim().is_empty())
            .and_then(|value| value.parse::<Verbosity>().ok())
            .unwrap_or_default();
        Self { verbosity }
    }

    /// Apply `count` verbosity flags.
    pub fn raise(self, count: u8) -> Self {
        Self {
            verbosity: self.verbosity.increase(i64::from(count) * Self::STEP),
        }
    }

    /// Install the global logger on stderr. Later calls are ignored.
    pub fn init(self) {
        let installed = env_logger::Builder::new()
            .filter_level(self.verbosity.filter())
            .target(env_logger::Target::Stderr)
            .try_init();
        if let Err(err) = installed {
            // a logger is already in place, keep it
            log::debug!("logger not replaced: {}", err);
        }
        log::debug!("verbosity set to {}", self.verbosity);
    }
}
