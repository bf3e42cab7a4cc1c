//! Hardware register store: trait, sysfs backend, dry-run wrapper, mock.
//!
//! Every hardware lever (LED channel, grade, fade timing, blink mode,
//! backlight, battery) is a named [`Register`] holding a small string or
//! integer. Reads and writes are blocking and single-attempt.
//!
//! The free functions [`read_string`], [`read_int`] and [`write_value`] are
//! the best-effort layer used by the arbiter: failures are logged and
//! replaced by a default (reads) or dropped (writes), never returned.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

// ── Error type ──

/// Register access errors.
#[derive(Debug)]
pub enum RegisterError {
    /// The backing node does not exist.
    NotFound(String),
    ReadFailed(String),
    WriteFailed(String),
    /// Write attempted on a register the hardware only reports.
    ReadOnly(Register),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::NotFound(path) => write!(f, "Register node not found: {path}"),
            RegisterError::ReadFailed(e) => write!(f, "Register read failed: {e}"),
            RegisterError::WriteFailed(e) => write!(f, "Register write failed: {e}"),
            RegisterError::ReadOnly(reg) => write!(f, "Register is read-only: {reg}"),
        }
    }
}

impl std::error::Error for RegisterError {}

pub type Result<T> = std::result::Result<T, RegisterError>;

// ── Registers ──

/// Named hardware registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Register {
    /// Indicator LED brightness (also drives the button channel).
    LedBrightness,
    LedBlinkMode,
    /// Output channel selector (`outn`).
    LedChannel,
    LedGrade,
    /// Fade timing triple: `"<fade> <full-on> <full-off>"`.
    LedFade,
    BacklightBrightness,
    BacklightMaxBrightness,
    BatteryCapacity,
    BatteryStatus,
}

impl Register {
    pub const ALL: [Register; 9] = [
        Register::LedBrightness,
        Register::LedBlinkMode,
        Register::LedChannel,
        Register::LedGrade,
        Register::LedFade,
        Register::BacklightBrightness,
        Register::BacklightMaxBrightness,
        Register::BatteryCapacity,
        Register::BatteryStatus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Register::LedBrightness => "led_brightness",
            Register::LedBlinkMode => "led_blink_mode",
            Register::LedChannel => "led_channel",
            Register::LedGrade => "led_grade",
            Register::LedFade => "led_fade",
            Register::BacklightBrightness => "backlight_brightness",
            Register::BacklightMaxBrightness => "backlight_max_brightness",
            Register::BatteryCapacity => "battery_capacity",
            Register::BatteryStatus => "battery_status",
        }
    }

    /// Whether the hardware accepts writes to this register.
    pub fn is_writable(self) -> bool {
        !matches!(
            self,
            Register::BacklightMaxBrightness | Register::BatteryCapacity | Register::BatteryStatus
        )
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Trait ──

pub trait RegisterStore {
    /// Read the raw register contents (first whitespace-separated token).
    fn read(&self, reg: Register) -> Result<String>;
    fn write(&self, reg: Register, value: &str) -> Result<()>;
}

// ── Best-effort helpers ──

/// Read a string register, substituting `""` on failure.
pub fn read_string(store: &impl RegisterStore, reg: Register) -> String {
    match store.read(reg) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("failed to read {reg}: {e}");
            String::new()
        }
    }
}

/// Read an integer register, returning `None` on failure or garbage.
pub fn try_read_int(store: &impl RegisterStore, reg: Register) -> Option<i64> {
    match store.read(reg) {
        Ok(v) => match v.trim().parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                log::warn!("failed to parse {reg}: {v:?} is not an integer");
                None
            }
        },
        Err(e) => {
            log::warn!("failed to read {reg}: {e}");
            None
        }
    }
}

/// Read an integer register, substituting `0` on failure.
pub fn read_int(store: &impl RegisterStore, reg: Register) -> i64 {
    try_read_int(store, reg).unwrap_or(0)
}

/// Write a value, logging and dropping any failure.
pub fn write_value(store: &impl RegisterStore, reg: Register, value: impl fmt::Display) {
    let value = value.to_string();
    if let Err(e) = store.write(reg, &value) {
        log::warn!("failed to write {value:?} to {reg}: {e}");
    }
}

// ── Sysfs backend ──

/// Default sysfs locations for the Nubia indicator layout.
pub const DEFAULT_LEDS_DIR: &str = "/sys/class/leds";
pub const DEFAULT_INDICATOR_LED: &str = "nubia_led";
pub const DEFAULT_BACKLIGHT_LED: &str = "lcd-backlight";
pub const DEFAULT_BATTERY_DIR: &str = "/sys/class/power_supply/battery";

/// Directory layout used to resolve registers to sysfs nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsLayout {
    pub indicator_dir: PathBuf,
    pub backlight_dir: PathBuf,
    pub battery_dir: PathBuf,
}

impl Default for SysfsLayout {
    fn default() -> Self {
        let leds = Path::new(DEFAULT_LEDS_DIR);
        SysfsLayout {
            indicator_dir: leds.join(DEFAULT_INDICATOR_LED),
            backlight_dir: leds.join(DEFAULT_BACKLIGHT_LED),
            battery_dir: PathBuf::from(DEFAULT_BATTERY_DIR),
        }
    }
}

impl SysfsLayout {
    /// Node path backing a register.
    pub fn path_for(&self, reg: Register) -> PathBuf {
        match reg {
            Register::LedBrightness => self.indicator_dir.join("brightness"),
            Register::LedBlinkMode => self.indicator_dir.join("blink_mode"),
            Register::LedChannel => self.indicator_dir.join("outn"),
            Register::LedGrade => self.indicator_dir.join("grade_parameter"),
            Register::LedFade => self.indicator_dir.join("fade_parameter"),
            Register::BacklightBrightness => self.backlight_dir.join("brightness"),
            Register::BacklightMaxBrightness => self.backlight_dir.join("max_brightness"),
            Register::BatteryCapacity => self.battery_dir.join("capacity"),
            Register::BatteryStatus => self.battery_dir.join("status"),
        }
    }
}

/// Register store backed by sysfs device nodes.
#[derive(Debug, Clone, Default)]
pub struct SysfsStore {
    layout: SysfsLayout,
}

impl SysfsStore {
    pub fn new(layout: SysfsLayout) -> Self {
        SysfsStore { layout }
    }

    pub fn layout(&self) -> &SysfsLayout {
        &self.layout
    }
}

impl RegisterStore for SysfsStore {
    fn read(&self, reg: Register) -> Result<String> {
        let path = self.layout.path_for(reg);
        let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RegisterError::NotFound(path.display().to_string()),
            _ => RegisterError::ReadFailed(format!("{}: {e}", path.display())),
        })?;
        Ok(contents
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string())
    }

    fn write(&self, reg: Register, value: &str) -> Result<()> {
        if !reg.is_writable() {
            return Err(RegisterError::ReadOnly(reg));
        }
        let path = self.layout.path_for(reg);
        // Device nodes are never created, only opened.
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    RegisterError::NotFound(path.display().to_string())
                }
                _ => RegisterError::WriteFailed(format!("{}: {e}", path.display())),
            })?;
        file.write_all(value.as_bytes())
            .map_err(|e| RegisterError::WriteFailed(format!("{}: {e}", path.display())))
    }
}

// ── Dry-run wrapper ──

/// Reads from an inner store, records writes instead of performing them.
pub struct DryRunStore<S> {
    inner: S,
    writes: Mutex<Vec<(Register, String)>>,
}

impl<S: RegisterStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        DryRunStore {
            inner,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Writes recorded so far, in order.
    pub fn writes(&self) -> Vec<(Register, String)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<S: RegisterStore> RegisterStore for DryRunStore<S> {
    fn read(&self, reg: Register) -> Result<String> {
        // Prefer a value this run has already "written" so later reads agree.
        let writes = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, v)) = writes.iter().rev().find(|(r, _)| *r == reg) {
            return Ok(v.clone());
        }
        drop(writes);
        self.inner.read(reg)
    }

    fn write(&self, reg: Register, value: &str) -> Result<()> {
        if !reg.is_writable() {
            return Err(RegisterError::ReadOnly(reg));
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((reg, value.to_string()));
        Ok(())
    }
}

// ── Mock store for testing ──

/// In-memory mock store for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::collections::HashSet;

    /// Thread-safe in-memory store. `write` records into `writes` and updates
    /// `values`; `read` serves from `values`. Individual registers can be made
    /// to fail.
    #[derive(Default)]
    pub struct MockStore {
        /// Current register contents.
        pub values: Mutex<HashMap<Register, String>>,
        /// Every successful write, in order.
        pub writes: Mutex<Vec<(Register, String)>>,
        /// Registers whose reads fail.
        pub failing_reads: Mutex<HashSet<Register>>,
        /// Registers whose writes fail.
        pub failing_writes: Mutex<HashSet<Register>>,
    }

    impl MockStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Store with a battery reporting `status` at `capacity` percent.
        pub fn with_battery(status: &str, capacity: i64) -> Self {
            let store = Self::new();
            store.set_value(Register::BatteryStatus, status);
            store.set_value(Register::BatteryCapacity, capacity);
            store
        }

        /// Seed a register without recording a write.
        pub fn set_value(&self, reg: Register, value: impl fmt::Display) {
            lock(&self.values).insert(reg, value.to_string());
        }

        pub fn value(&self, reg: Register) -> Option<String> {
            lock(&self.values).get(&reg).cloned()
        }

        pub fn writes(&self) -> Vec<(Register, String)> {
            lock(&self.writes).clone()
        }

        /// Drain the recorded writes.
        pub fn take_writes(&self) -> Vec<(Register, String)> {
            std::mem::take(&mut *lock(&self.writes))
        }

        /// Writes recorded for a single register, in order.
        pub fn writes_to(&self, reg: Register) -> Vec<String> {
            lock(&self.writes)
                .iter()
                .filter(|(r, _)| *r == reg)
                .map(|(_, v)| v.clone())
                .collect()
        }

        pub fn fail_reads(&self, reg: Register) {
            lock(&self.failing_reads).insert(reg);
        }

        pub fn fail_writes(&self, reg: Register) {
            lock(&self.failing_writes).insert(reg);
        }
    }

    fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    impl RegisterStore for MockStore {
        fn read(&self, reg: Register) -> Result<String> {
            if lock(&self.failing_reads).contains(&reg) {
                return Err(RegisterError::ReadFailed(format!("mock://{reg}")));
            }
            lock(&self.values)
                .get(&reg)
                .cloned()
                .ok_or_else(|| RegisterError::NotFound(format!("mock://{reg}")))
        }

        fn write(&self, reg: Register, value: &str) -> Result<()> {
            if !reg.is_writable() {
                return Err(RegisterError::ReadOnly(reg));
            }
            if lock(&self.failing_writes).contains(&reg) {
                return Err(RegisterError::WriteFailed(format!("mock://{reg}")));
            }
            lock(&self.writes).push((reg, value.to_string()));
            lock(&self.values).insert(reg, value.to_string());
            Ok(())
        }
    }
}
