//! Light arbiter: resolves concurrent light requests onto the hardware.
//!
//! Attention, notification, battery and (indirectly) button requests all
//! compete for the one breathing LED. The arbiter caches the latest state of
//! each source and, on every update, hands the LED to the highest-priority
//! lit source:
//!
//! ```text
//! attention > notification > buttons > battery (fallback, even when dark)
//! ```
//!
//! Buttons additionally own a separate backlight channel, and the display
//! backlight is a standalone register with its own lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::encoder::{self, BatteryStatus, BreathSource};
use crate::profile::HardwareProfile;
use crate::registers::{self, Register, RegisterStore};
use crate::state::{LightState, LightType, SUPPORTED_TYPES, Status};

/// Cached state of every source sharing the breathing LED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArbiterState {
    pub attention: LightState,
    /// Stored after alpha pre-scaling.
    pub notification: LightState,
    pub battery: LightState,
    pub buttons: LightState,
    /// Set once the button LEDs have been parked on first use.
    pub buttons_initialized: bool,
}

impl ArbiterState {
    /// Pick the source that owns the breathing LED and the state to show.
    pub fn select(&self) -> (BreathSource, LightState) {
        if self.attention.is_lit() {
            (BreathSource::Attention, self.attention)
        } else if self.notification.is_lit() {
            (BreathSource::Notification, self.notification)
        } else if self.buttons.is_lit() {
            (BreathSource::Buttons, self.buttons)
        } else {
            (BreathSource::Battery, self.battery)
        }
    }
}

/// Thread-safe light arbitration service over a register store.
pub struct LightArbiter<S> {
    store: S,
    profile: HardwareProfile,
    table: Mutex<ArbiterState>,
    backlight: Mutex<()>,
}

impl<S: RegisterStore> LightArbiter<S> {
    /// Arbiter using the built-in Nubia profile.
    pub fn new(store: S) -> Self {
        Self::with_profile(store, HardwareProfile::default())
    }

    pub fn with_profile(store: S, profile: HardwareProfile) -> Self {
        LightArbiter {
            store,
            profile,
            table: Mutex::new(ArbiterState::default()),
            backlight: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn profile(&self) -> &HardwareProfile {
        &self.profile
    }

    /// Supported light types, in priority order.
    pub fn supported_types(&self) -> &'static [LightType] {
        &SUPPORTED_TYPES
    }

    /// Copy of the cached source table.
    pub fn snapshot(&self) -> ArbiterState {
        *self.lock_table()
    }

    /// The source that currently owns the breathing LED.
    pub fn active_source(&self) -> BreathSource {
        self.lock_table().select().0
    }

    /// Apply a light request from the platform.
    ///
    /// Register failures are logged and dropped; the call still succeeds
    /// because the cached state was updated. Unsupported types leave both
    /// the cache and the hardware untouched.
    pub fn set_light(&self, light: LightType, state: LightState) -> Status {
        match light {
            LightType::Attention => {
                let mut table = self.lock_table();
                table.attention = state;
                self.refresh_breathing_locked(&table);
            }
            LightType::Notifications => {
                let mut table = self.lock_table();
                table.notification = LightState {
                    color: encoder::scale_by_alpha(state.color),
                    ..state
                };
                self.refresh_breathing_locked(&table);
            }
            LightType::Battery => {
                let mut table = self.lock_table();
                table.battery = state;
                self.refresh_breathing_locked(&table);
            }
            LightType::Buttons => {
                let mut table = self.lock_table();
                self.set_buttons_locked(&mut table, state);
            }
            LightType::Backlight => self.set_backlight(&state),
            LightType::Keyboard | LightType::Bluetooth | LightType::Wifi => {
                log::debug!("ignoring {light} request: not supported");
                return Status::LightNotSupported;
            }
        }
        Status::Success
    }

    /// [`set_light`](Self::set_light) for a raw platform type id.
    pub fn set_light_raw(&self, type_id: i32, state: LightState) -> Status {
        match LightType::from_id(type_id) {
            Some(light) => self.set_light(light, state),
            None => {
                log::debug!("ignoring request for unknown light type id {type_id}");
                Status::LightNotSupported
            }
        }
    }

    fn lock_table(&self) -> MutexGuard<'_, ArbiterState> {
        // Fields are only ever replaced whole; a poisoned table is still valid.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-run the priority scan and write the winner's frame.
    fn refresh_breathing_locked(&self, table: &ArbiterState) {
        let (source, state) = table.select();
        match encoder::encode_breathing(source, &state, &self.profile, || {
            BatteryStatus::read(&self.store)
        }) {
            Some(frame) => {
                log::debug!(
                    "breathing LED <- {source:?}: channel={} grade={} fade=\"{}\" blink={}",
                    frame.channel,
                    frame.grade,
                    frame.fade,
                    frame.blink_mode
                );
                frame.apply(&self.store);
            }
            None => log::debug!("breathing LED unchanged: steady {source:?} has no pattern"),
        }
    }

    fn set_buttons_locked(&self, table: &mut ArbiterState, state: LightState) {
        let brightness = encoder::luma(state.color);
        let channels = &self.profile.channels;
        let blink = &self.profile.blink;
        table.buttons = state;

        if brightness == 0 {
            registers::write_value(&self.store, Register::LedChannel, channels.button);
            registers::write_value(&self.store, Register::LedBlinkMode, blink.off);
            registers::write_value(&self.store, Register::LedBrightness, 0);
            self.refresh_breathing_locked(table);
            return;
        }

        if !table.buttons_initialized {
            // Park every button LED before the first real write.
            registers::write_value(&self.store, Register::LedFade, encoder::FADE_IDLE);
            registers::write_value(&self.store, Register::LedBlinkMode, blink.breath);
            registers::write_value(&self.store, Register::LedBrightness, 0);
            table.buttons_initialized = true;
            log::info!("button LEDs initialized");
        }

        self.refresh_breathing_locked(table);

        registers::write_value(&self.store, Register::LedChannel, channels.button);
        registers::write_value(&self.store, Register::LedBrightness, brightness);
        registers::write_value(&self.store, Register::LedBlinkMode, blink.breath_once);
    }

    fn set_backlight(&self, state: &LightState) {
        let _guard = self
            .backlight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let max = registers::try_read_int(&self.store, Register::BacklightMaxBrightness);
        let level = encoder::backlight_level(encoder::luma(state.color), max, &self.profile);
        log::debug!("backlight <- {level} (max {max:?})");
        registers::write_value(&self.store, Register::BacklightBrightness, level);
    }
}
