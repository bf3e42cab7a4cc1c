//! Breathing timing quantizer.
//!
//! The controller has no notion of milliseconds. A blink is described by a
//! fade-timing triple of small codes (`"<fade> <full-on> <full-off>"`), each
//! picked from a fixed set of duration buckets.

use crate::state::{FlashMode, LightState};

/// Full-on code meaning "stay lit"; a continuously lit breath is not allowed.
pub const ALWAYS_ON: i32 = -1;

/// Requested on/off durations of a state. Anything but a timed flash is 0/0.
pub fn flash_durations(state: &LightState) -> (i32, i32) {
    match state.flash_mode {
        FlashMode::Timed => (state.flash_on_ms, state.flash_off_ms),
        FlashMode::None | FlashMode::Hardware => (0, 0),
    }
}

/// Bucket the on-duration into a full-on code.
///
/// | on (ms)      | code |
/// |--------------|------|
/// | 1            | -1   |
/// | 2..=250      | 0    |
/// | 251..=500    | 1    |
/// | 501..=1000   | 2    |
/// | 1001..=2000  | 3    |
/// | 2001..=5000  | 4    |
/// | > 5000       | 5    |
pub fn quantize_on(on_ms: i32) -> i32 {
    match on_ms {
        1 => ALWAYS_ON,
        i32::MIN..=250 => 0,
        251..=500 => 1,
        501..=1000 => 2,
        1001..=2000 => 3,
        2001..=5000 => 4,
        _ => 5,
    }
}

/// Bucket the off-duration into a fade code. Same boundaries as
/// [`quantize_on`], codes shifted up by one.
pub fn quantize_off(off_ms: i32) -> i32 {
    match off_ms {
        i32::MIN..=250 => 1,
        251..=500 => 2,
        501..=1000 => 3,
        1001..=2000 => 4,
        2001..=5000 => 5,
        _ => 6,
    }
}

/// Quantized blink timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathTiming {
    pub fade: i32,
    pub full_on: i32,
}

impl BreathTiming {
    /// Blink timing for the given durations, or `None` when not blinking
    /// (either duration zero or negative).
    pub fn from_durations(on_ms: i32, off_ms: i32) -> Option<Self> {
        if on_ms <= 0 || off_ms <= 0 {
            return None;
        }
        let full_on = quantize_on(on_ms);
        let fade = if full_on == ALWAYS_ON {
            0
        } else {
            quantize_off(off_ms)
        };
        Some(BreathTiming { fade, full_on })
    }

    pub fn from_state(state: &LightState) -> Option<Self> {
        let (on, off) = flash_durations(state);
        Self::from_durations(on, off)
    }

    /// Register form: the full-on code doubles as the full-off code.
    pub fn fade_triple(&self) -> String {
        format!("{} {} {}", self.fade, self.full_on, self.full_on)
    }
}
