//! Application configuration: TOML-based, platform-aware paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::profile::{HardwareProfile, ProfileOverrides};
use crate::registers::{self, SysfsLayout, SysfsStore};

/// Header comment prepended to saved config files.
const CONFIG_HEADER: &str =
    "# breathlight configuration: changes made outside the tool may be overwritten.\n\n";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the LED class devices. Default: "/sys/class/leds".
    #[serde(default = "default_leds_dir")]
    pub leds_dir: String,

    /// LED device name of the breathing indicator controller. Default: "nubia_led".
    #[serde(default = "default_indicator_led")]
    pub indicator_led: String,

    /// LED device name of the display backlight. Default: "lcd-backlight".
    #[serde(default = "default_backlight_led")]
    pub backlight_led: String,

    /// Power-supply directory reporting battery status and capacity.
    #[serde(default = "default_battery_dir")]
    pub battery_dir: String,

    /// Per-constant overrides of the built-in hardware profile.
    /// Example in TOML: `[profile]` / `channel_home = 16`
    #[serde(default, skip_serializing_if = "ProfileOverrides::is_empty")]
    pub profile: ProfileOverrides,
}

fn default_leds_dir() -> String {
    registers::DEFAULT_LEDS_DIR.into()
}
fn default_indicator_led() -> String {
    registers::DEFAULT_INDICATOR_LED.into()
}
fn default_backlight_led() -> String {
    registers::DEFAULT_BACKLIGHT_LED.into()
}
fn default_battery_dir() -> String {
    registers::DEFAULT_BATTERY_DIR.into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            leds_dir: default_leds_dir(),
            indicator_led: default_indicator_led(),
            backlight_led: default_backlight_led(),
            battery_dir: default_battery_dir(),
            profile: ProfileOverrides::default(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is empty or whitespace-only.
    EmptyField(&'static str),
    /// A directory field is not an absolute path.
    RelativePath { field: &'static str, path: String },
    /// An LED device name contains a path separator.
    InvalidLedName { field: &'static str, name: String },
    /// `profile.battery_fade` is not three integers.
    InvalidFade(String),
    /// `profile.full_capacity` is outside 0..=100.
    InvalidCapacity(i64),
    /// `profile.default_max_backlight` is not positive.
    InvalidMaxBacklight(i64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{field} cannot be empty"),
            ValidationError::RelativePath { field, path } => {
                write!(f, "Invalid {field}: {path} is not an absolute path")
            }
            ValidationError::InvalidLedName { field, name } => {
                write!(f, "Invalid {field}: {name:?} must be a bare LED name")
            }
            ValidationError::InvalidFade(v) => {
                write!(f, "Invalid profile.battery_fade: {v:?} (expected three integers)")
            }
            ValidationError::InvalidCapacity(v) => {
                write!(f, "Invalid profile.full_capacity: {v} (expected 0-100)")
            }
            ValidationError::InvalidMaxBacklight(v) => {
                write!(f, "Invalid profile.default_max_backlight: {v} (must be positive)")
            }
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("breathlight"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Save config to an arbitrary path atomically (write to temp file, then rename).
    ///
    /// A header comment is prepended to warn that manual edits may be overwritten.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        let contents = format!("{CONFIG_HEADER}{serialized}");
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &contents)?;
        match std::fs::rename(&tmp, path) {
            Ok(()) => Ok(()),
            Err(_) => {
                // Rename can fail across filesystems; fall back to direct write + cleanup
                let result = std::fs::write(path, &contents);
                let _ = std::fs::remove_file(&tmp);
                result
            }
        }
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Sysfs directory layout described by this config.
    pub fn layout(&self) -> SysfsLayout {
        let leds = Path::new(&self.leds_dir);
        SysfsLayout {
            indicator_dir: leds.join(&self.indicator_led),
            backlight_dir: leds.join(&self.backlight_led),
            battery_dir: PathBuf::from(&self.battery_dir),
        }
    }

    /// Register store over the configured sysfs nodes.
    pub fn store(&self) -> SysfsStore {
        SysfsStore::new(self.layout())
    }

    /// Built-in profile with this config's overrides applied.
    pub fn hardware_profile(&self) -> HardwareProfile {
        self.profile.apply(HardwareProfile::default())
    }

    /// Validate the entire config, collecting all errors.
    pub fn validate(&self) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (field, value) in [("leds_dir", &self.leds_dir), ("battery_dir", &self.battery_dir)] {
            if value.trim().is_empty() {
                errors.push(ValidationError::EmptyField(field));
            } else if !Path::new(value).is_absolute() {
                errors.push(ValidationError::RelativePath {
                    field,
                    path: value.clone(),
                });
            }
        }

        for (field, value) in [
            ("indicator_led", &self.indicator_led),
            ("backlight_led", &self.backlight_led),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::EmptyField(field));
            } else if value.contains('/') || value == ".." || value == "." {
                errors.push(ValidationError::InvalidLedName {
                    field,
                    name: value.clone(),
                });
            }
        }

        if let Some(fade) = &self.profile.battery_fade {
            let parts: Vec<&str> = fade.split_whitespace().collect();
            if parts.len() != 3 || parts.iter().any(|p| p.parse::<i32>().is_err()) {
                errors.push(ValidationError::InvalidFade(fade.clone()));
            }
        }

        if let Some(cap) = self.profile.full_capacity
            && !(0..=100).contains(&cap)
        {
            errors.push(ValidationError::InvalidCapacity(cap));
        }

        if let Some(max) = self.profile.default_max_backlight
            && max <= 0
        {
            errors.push(ValidationError::InvalidMaxBacklight(max));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
