//! Error types for configuration and host-supplied buffers

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got {value}")]
    NonPositiveDuration { name: &'static str, value: f64 },

    #[error("{name} of {value} seconds is too long to schedule")]
    DurationOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be a positive finite size, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("Invalid mask: expected {expected} alpha values, got {actual}")]
    InvalidMask { expected: usize, actual: usize },

    #[error("Invalid sprite: expected {expected} RGBA values, got {actual}")]
    InvalidSprite { expected: usize, actual: usize },

    #[error("Gradient needs at least one color stop")]
    InvalidGradient,
}

#[cfg(feature = "python")]
impl From<ConfigError> for pyo3::PyErr {
    fn from(err: ConfigError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Convert seconds into a schedulable period.
///
/// Zero, negative, and non-finite values are rejected, as are values that
/// round down to zero nanoseconds or overflow `Duration`.
pub(crate) fn period(name: &'static str, value: f64) -> Result<Duration> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::NonPositiveDuration { name, value });
    }
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if duration.is_zero() => Err(ConfigError::NonPositiveDuration { name, value }),
        Ok(duration) => Ok(duration),
        Err(_) => Err(ConfigError::DurationOutOfRange { name, value }),
    }
}

/// Same checks as [`period`], keeping the value in seconds.
pub(crate) fn positive_duration(name: &'static str, value: f64) -> Result<f64> {
    period(name, value).map(|_| value)
}

pub(crate) fn positive_dimension(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidDimension { name, value })
    }
}

/// Surface sides may be zero (nothing is drawn) but not negative or non-finite.
pub(crate) fn surface_dimension(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidDimension { name, value })
    }
}
