//! Light request data model: light types, flash modes, light state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BreathlightError;

/// Light types the platform can address, with their stable platform ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightType {
    Backlight,
    Keyboard,
    Buttons,
    Battery,
    Notifications,
    Attention,
    Bluetooth,
    Wifi,
}

/// Types this device services, in registration (priority) order.
pub const SUPPORTED_TYPES: [LightType; 5] = [
    LightType::Attention,
    LightType::Notifications,
    LightType::Battery,
    LightType::Backlight,
    LightType::Buttons,
];

impl LightType {
    /// Platform id of this type.
    pub fn id(self) -> i32 {
        match self {
            LightType::Backlight => 0,
            LightType::Keyboard => 1,
            LightType::Buttons => 2,
            LightType::Battery => 3,
            LightType::Notifications => 4,
            LightType::Attention => 5,
            LightType::Bluetooth => 6,
            LightType::Wifi => 7,
        }
    }

    pub fn from_id(id: i32) -> Option<LightType> {
        Some(match id {
            0 => LightType::Backlight,
            1 => LightType::Keyboard,
            2 => LightType::Buttons,
            3 => LightType::Battery,
            4 => LightType::Notifications,
            5 => LightType::Attention,
            6 => LightType::Bluetooth,
            7 => LightType::Wifi,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            LightType::Backlight => "backlight",
            LightType::Keyboard => "keyboard",
            LightType::Buttons => "buttons",
            LightType::Battery => "battery",
            LightType::Notifications => "notifications",
            LightType::Attention => "attention",
            LightType::Bluetooth => "bluetooth",
            LightType::Wifi => "wifi",
        }
    }

    pub fn is_supported(self) -> bool {
        SUPPORTED_TYPES.contains(&self)
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LightType {
    type Err = BreathlightError;

    /// Accepts type names (case-insensitive, `notification` as an alias) or
    /// a numeric platform id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i32>() {
            return LightType::from_id(id)
                .ok_or_else(|| BreathlightError::Event(format!("unknown light type id: {id}")));
        }
        match s.to_lowercase().as_str() {
            "backlight" => Ok(LightType::Backlight),
            "keyboard" => Ok(LightType::Keyboard),
            "buttons" | "button" => Ok(LightType::Buttons),
            "battery" => Ok(LightType::Battery),
            "notifications" | "notification" => Ok(LightType::Notifications),
            "attention" => Ok(LightType::Attention),
            "bluetooth" => Ok(LightType::Bluetooth),
            "wifi" => Ok(LightType::Wifi),
            _ => Err(BreathlightError::Event(format!("unknown light type: {s}"))),
        }
    }
}

/// Flash behavior requested with a light state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashMode {
    #[default]
    None,
    /// Blink with the given on/off durations.
    Timed,
    /// Hardware-driven flashing. Not available here; encoded like `None`.
    Hardware,
}

/// Brightness source hint. Carried through, never interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessMode {
    #[default]
    User,
    Sensor,
    LowPersistence,
}

/// One requested light state. Replaces the previous state of its type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    /// `0xAARRGGBB`.
    pub color: u32,
    #[serde(default)]
    pub flash_mode: FlashMode,
    #[serde(default)]
    pub flash_on_ms: i32,
    #[serde(default)]
    pub flash_off_ms: i32,
    #[serde(default)]
    pub brightness_mode: BrightnessMode,
}

impl LightState {
    /// The "off" state every source starts with.
    pub const OFF: LightState = LightState {
        color: 0,
        flash_mode: FlashMode::None,
        flash_on_ms: 0,
        flash_off_ms: 0,
        brightness_mode: BrightnessMode::User,
    };

    /// Steady state with the given color.
    pub fn solid(color: u32) -> Self {
        LightState {
            color,
            ..LightState::OFF
        }
    }

    /// Timed blink with the given color and durations.
    pub fn timed(color: u32, on_ms: i32, off_ms: i32) -> Self {
        LightState {
            color,
            flash_mode: FlashMode::Timed,
            flash_on_ms: on_ms,
            flash_off_ms: off_ms,
            brightness_mode: BrightnessMode::User,
        }
    }

    /// Whether any RGB channel is non-zero. Alpha is ignored.
    pub fn is_lit(&self) -> bool {
        self.color & 0x00FF_FFFF != 0
    }
}

/// Result of a `set_light` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    LightNotSupported,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::LightNotSupported => write!(f, "light not supported"),
        }
    }
}
