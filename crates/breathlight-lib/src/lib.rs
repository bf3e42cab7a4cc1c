//! Breathlight: light arbitration for Nubia's shared breathing LED and backlight.

pub mod arbiter;
pub mod config;
pub mod encoder;
pub mod error;
pub mod profile;
pub mod registers;
pub mod state;

pub use arbiter::{ArbiterState, LightArbiter};
pub use error::BreathlightError;
pub use state::{LightState, LightType, Status};
