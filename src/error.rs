//! Configuration errors
//!
//! Everything that can go wrong in the core is a configuration problem:
//! rejected charge/preview parameters, an unusable projectile template, or a
//! settings file that cannot be read. Rate-limited starts and idle releases are
//! normal control flow and never show up here.

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// `min_power` is greater than `max_power`
    PowerRange { min: f32, max: f32 },
    /// A charge/preview parameter that must be a finite, non-negative number
    InvalidValue { field: &'static str, value: f32 },
    /// Preview must record at least the launch origin
    ZeroSampleCount,
    /// Preview sample count above `consts::MAX_PREVIEW_SAMPLES`
    SampleCountTooLarge { count: usize, max: usize },
    /// Preview step duration must be positive
    NonPositiveStep(f32),
    /// Projectile template cannot produce a physics body
    InvalidTemplate(&'static str),
    /// Settings file could not be read or written
    Io(std::io::Error),
    /// Settings file is not valid JSON for `LauncherSettings`
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PowerRange { min, max } => {
                write!(f, "min power {min} exceeds max power {max}")
            }
            ConfigError::InvalidValue { field, value } => {
                write!(f, "invalid value for {field}: {value}")
            }
            ConfigError::ZeroSampleCount => write!(f, "sample count must be at least 1"),
            ConfigError::SampleCountTooLarge { count, max } => {
                write!(f, "sample count {count} exceeds the limit of {max}")
            }
            ConfigError::NonPositiveStep(step) => {
                write!(f, "sample step must be positive, got {step}")
            }
            ConfigError::InvalidTemplate(reason) => {
                write!(f, "projectile template unusable: {reason}")
            }
            ConfigError::Io(err) => write!(f, "settings io error: {err}"),
            ConfigError::Parse(err) => write!(f, "settings parse error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
