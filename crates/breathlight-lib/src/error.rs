//! Unified error type for the breathlight-lib crate.
//!
//! [`BreathlightError`] wraps register-store failures ([`RegisterError`]) and
//! domain-specific error kinds (`Config`, `Color`, `Event`).
//! `From` impls allow `?` to propagate across module boundaries.
//!
//! Note that the arbiter itself never surfaces these: register failures are
//! logged and dropped there. They only reach callers of the lower-level
//! store API, config loading and the CLI.

use std::fmt;

use crate::registers::RegisterError;

/// Unified error type for breathlight-lib operations.
#[derive(Debug)]
pub enum BreathlightError {
    /// Hardware register read/write failure.
    Register(RegisterError),
    /// Standard I/O error (config persistence, event files).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
    /// Malformed light event (replay input, CLI arguments).
    Event(String),
}

impl fmt::Display for BreathlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreathlightError::Register(e) => write!(f, "{e}"),
            BreathlightError::Io(e) => write!(f, "I/O error: {e}"),
            BreathlightError::Config(e) => write!(f, "Config error: {e}"),
            BreathlightError::Color(e) => write!(f, "Color error: {e}"),
            BreathlightError::Event(e) => write!(f, "Event error: {e}"),
        }
    }
}

impl std::error::Error for BreathlightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BreathlightError::Register(e) => Some(e),
            BreathlightError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegisterError> for BreathlightError {
    fn from(e: RegisterError) -> Self {
        BreathlightError::Register(e)
    }
}

impl From<std::io::Error> for BreathlightError {
    fn from(e: std::io::Error) -> Self {
        BreathlightError::Io(e)
    }
}

/// Crate-level Result alias using [`BreathlightError`].
pub type Result<T> = std::result::Result<T, BreathlightError>;
