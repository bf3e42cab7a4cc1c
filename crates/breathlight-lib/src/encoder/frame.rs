//! Register frames: what gets written to the indicator and backlight.

use serde::Serialize;

use crate::profile::HardwareProfile;
use crate::registers::{self, Register, RegisterStore};
use crate::state::LightState;

use super::color::luma;
use super::timing::BreathTiming;

/// Fade triple that parks the breathing engine.
pub const FADE_IDLE: &str = "0 0 0";

/// Source currently driving the shared breathing LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathSource {
    Attention,
    Notification,
    Buttons,
    Battery,
}

/// One complete write to the shared LED's pattern registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedFrame {
    pub channel: i32,
    pub grade: i32,
    pub fade: String,
    pub blink_mode: i32,
}

impl LedFrame {
    /// The shared LED fully disabled.
    pub fn off(profile: &HardwareProfile) -> Self {
        LedFrame {
            channel: profile.channels.home,
            grade: 0,
            fade: FADE_IDLE.into(),
            blink_mode: profile.blink.off,
        }
    }

    /// Write channel, grade, fade and blink mode, in that order.
    pub fn apply(&self, store: &impl RegisterStore) {
        registers::write_value(store, Register::LedChannel, self.channel);
        registers::write_value(store, Register::LedGrade, self.grade);
        registers::write_value(store, Register::LedFade, &self.fade);
        registers::write_value(store, Register::LedBlinkMode, self.blink_mode);
    }
}

/// Live battery condition as reported by the power supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatteryStatus {
    pub charging: bool,
    pub capacity: i64,
}

impl BatteryStatus {
    /// `"Full"` counts as charging: the charger is still attached.
    pub fn from_raw(status: &str, capacity: i64) -> Self {
        BatteryStatus {
            charging: status == "Charging" || status == "Full",
            capacity,
        }
    }

    /// Read status and capacity, substituting defaults on failure.
    pub fn read(store: &impl RegisterStore) -> Self {
        let status = registers::read_string(store, Register::BatteryStatus);
        let capacity = registers::read_int(store, Register::BatteryCapacity);
        Self::from_raw(&status, capacity)
    }

    pub fn indication(&self, profile: &HardwareProfile) -> BatteryIndication {
        if !self.charging {
            BatteryIndication::Low
        } else if self.capacity < profile.full_capacity {
            BatteryIndication::Charging
        } else {
            BatteryIndication::Full
        }
    }
}

/// What the battery pattern conveys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryIndication {
    Low,
    Charging,
    Full,
}

/// Frame for the battery pattern.
pub fn battery_frame(indication: BatteryIndication, profile: &HardwareProfile) -> LedFrame {
    let (grade, blink_mode) = match indication {
        BatteryIndication::Low => (profile.grades.battery_low, profile.blink.breath),
        BatteryIndication::Charging => (profile.grades.battery, profile.blink.breath),
        BatteryIndication::Full => (profile.grades.battery, profile.blink.breath_once),
    };
    LedFrame {
        channel: profile.channels.home,
        grade,
        fade: profile.battery_fade.clone(),
        blink_mode,
    }
}

/// Encode the state of the source that owns the shared LED.
///
/// `battery` is only consulted for a steady, lit battery source. Returns
/// `None` when the source has nothing to show on this hardware (a steady
/// attention or notification color): the LED keeps its current pattern.
pub fn encode_breathing(
    source: BreathSource,
    state: &LightState,
    profile: &HardwareProfile,
    battery: impl FnOnce() -> BatteryStatus,
) -> Option<LedFrame> {
    if let Some(timing) = BreathTiming::from_state(state) {
        return Some(LedFrame {
            channel: profile.channels.home,
            grade: profile.grades.notification,
            fade: timing.fade_triple(),
            blink_mode: profile.blink.breath,
        });
    }

    if luma(state.color) == 0 {
        return Some(LedFrame::off(profile));
    }

    match source {
        BreathSource::Buttons => Some(LedFrame {
            channel: profile.channels.home,
            grade: profile.grades.button,
            fade: profile.button_fade.clone(),
            blink_mode: profile.blink.breath_once,
        }),
        BreathSource::Battery => Some(battery_frame(battery().indication(profile), profile)),
        BreathSource::Attention | BreathSource::Notification => None,
    }
}

/// Backlight register value for a luma, given the reported maximum.
///
/// An unreadable or negative maximum falls back to the profile default;
/// luma is rescaled only when the maximum differs from that default.
pub fn backlight_level(luma: u32, reported_max: Option<i64>, profile: &HardwareProfile) -> i64 {
    let default_max = profile.default_max_backlight;
    let max = match reported_max {
        Some(m) if m >= 0 => m,
        _ => default_max,
    };
    let luma = i64::from(luma);
    if max != default_max && default_max > 0 {
        luma.saturating_mul(max) / default_max
    } else {
        luma
    }
}
