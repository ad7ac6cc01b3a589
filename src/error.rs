// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RainError {
    #[error("drawing surface cannot provide a 2d paint context")]
    NoPaintContext,

    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid color: {0} (expected RRGGBB hex, e.g. 00FF41)")]
    InvalidColor(String),

    #[error("--chars: {0}")]
    InvalidChars(String),

    #[error("unsupported charset: {0} (see --list-charsets)")]
    UnknownCharset(String),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl RainError {
    #[must_use]
    pub fn out_of_range(name: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            name,
            value,
            min,
            max,
        }
    }
}

/// Checks that `value` is finite and inside `min..=max`.
pub fn require_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64, RainError> {
    if !value.is_finite() || value < min || value > max {
        return Err(RainError::out_of_range(name, value, min, max));
    }
    Ok(value)
}
