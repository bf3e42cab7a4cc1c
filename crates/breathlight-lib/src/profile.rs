//! Hardware profile: register constants for the breathing indicator LED.
//!
//! The indicator controller only understands small integer codes. Every
//! such code the encoder emits comes from a [`HardwareProfile`], so tests
//! and alternative boards can swap the whole table without touching the
//! encoding logic.

use serde::{Deserialize, Serialize};

/// Blink-mode register values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkModes {
    pub off: i32,
    /// Steady on. The controller reuses the one-shot code for this.
    /// Informational only: no frame emits it.
    pub on: i32,
    /// Continuous breathing.
    pub breath: i32,
    /// Single breath, then hold.
    pub breath_once: i32,
}

/// Output channel selector (`outn`) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channels {
    /// The shared breathing LED under the home key.
    pub home: i32,
    /// The capacitive button backlight.
    pub button: i32,
}

/// Grade register values, one per visual role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grades {
    pub button: i32,
    /// Informational only: no frame emits it.
    pub home: i32,
    pub battery_low: i32,
    pub notification: i32,
    pub battery: i32,
}

/// Complete register profile for one indicator controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareProfile {
    pub name: String,
    pub blink: BlinkModes,
    pub channels: Channels,
    pub grades: Grades,
    /// Fade triple used for every battery pattern.
    pub battery_fade: String,
    /// Fade triple for the one-shot button breath.
    pub button_fade: String,
    /// Capacity (percent) at which a charging battery counts as full.
    pub full_capacity: i64,
    /// Backlight scale the luma is expressed in; also the fallback maximum.
    pub default_max_backlight: i64,
}

/// Register profile of the Nubia `nubia_led` controller.
pub fn nubia_profile() -> HardwareProfile {
    HardwareProfile {
        name: "nubia".into(),
        blink: BlinkModes {
            off: 1,
            on: 6,
            breath: 3,
            breath_once: 6,
        },
        channels: Channels { home: 16, button: 8 },
        grades: Grades {
            button: 8,
            home: 8,
            battery_low: 0,
            notification: 6,
            battery: 6,
        },
        battery_fade: "3 0 4".into(),
        button_fade: "1 0 0".into(),
        full_capacity: 90,
        default_max_backlight: 255,
    }
}

impl Default for HardwareProfile {
    fn default() -> Self {
        nubia_profile()
    }
}

/// Optional per-field overrides, as found in the `[profile]` config table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink_off: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink_breath: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink_breath_once: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_home: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_button: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_button: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_battery_low: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_notification: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_battery: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_fade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_capacity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_backlight: Option<i64>,
}

impl ProfileOverrides {
    pub fn is_empty(&self) -> bool {
        *self == ProfileOverrides::default()
    }

    /// Apply the set fields on top of `base`.
    pub fn apply(&self, mut base: HardwareProfile) -> HardwareProfile {
        fn set<T: Clone>(slot: &mut T, v: &Option<T>) {
            if let Some(v) = v {
                *slot = v.clone();
            }
        }
        set(&mut base.blink.off, &self.blink_off);
        set(&mut base.blink.breath, &self.blink_breath);
        set(&mut base.blink.breath_once, &self.blink_breath_once);
        set(&mut base.channels.home, &self.channel_home);
        set(&mut base.channels.button, &self.channel_button);
        set(&mut base.grades.button, &self.grade_button);
        set(&mut base.grades.battery_low, &self.grade_battery_low);
        set(&mut base.grades.notification, &self.grade_notification);
        set(&mut base.grades.battery, &self.grade_battery);
        set(&mut base.battery_fade, &self.battery_fade);
        set(&mut base.full_capacity, &self.full_capacity);
        set(&mut base.default_max_backlight, &self.default_max_backlight);
        if !self.is_empty() {
            base.name = format!("{} (customized)", base.name);
        }
        base
    }
}
