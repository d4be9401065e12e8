//! Error types for renderer configuration.

use thiserror::Error;

use crate::render::Capability;

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised by setters; a failed call never mutates renderer state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid {what} dimensions: expected {expected_width}x{expected_height}, got {width}x{height}")]
    InvalidDimensions {
        what: &'static str,
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid {what}: expected {expected} elements, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {name}: {value} is outside {min}..{max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid {name}: not a finite number")]
    NotANumber { name: &'static str },

    #[error("unknown capability '{0}'")]
    UnknownCapability(String),

    #[error("invalid quality '{0}': must be 'low', 'medium' or 'high'")]
    InvalidQuality(String),

    #[error("invalid color '{0}': must be in fully-qualified hexadecimal form (#rrggbb)")]
    InvalidColor(String),

    #[error("capability '{0}' not enabled")]
    CapabilityNotEnabled(Capability),

    #[error("no texture added at height 255; unable to composite")]
    MissingTopTexture,
}

impl RenderError {
    /// Checks a numeric argument: finite and within `[min, max)`.
    pub(crate) fn check_half_open(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(RenderError::NotANumber { name });
        }
        if value < min || value >= max {
            return Err(RenderError::OutOfRange { name, value, min, max });
        }
        Ok(value)
    }
}
