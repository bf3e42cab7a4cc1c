//! Integration tests: end-to-end arbitration sequences through the public API.
//!
//! These tests drive [`LightArbiter`] the way the platform does, one request
//! at a time, and check what lands in the registers: which source owns the
//! breathing LED, what the battery fallback shows, and how button and
//! backlight requests interleave with it.

use std::sync::Arc;
use std::thread;

use breathlight_lib::config::Config;
use breathlight_lib::encoder::BreathSource;
use breathlight_lib::registers::mock::MockStore;
use breathlight_lib::registers::{Register, RegisterStore};
use breathlight_lib::{LightArbiter, LightState, LightType, Status};

const WHITE: u32 = 0xFFFF_FFFF;
const GREEN: u32 = 0xFF00_FF00;

/// Helper: arbiter over a mock with the given battery condition.
fn arbiter_with_battery(status: &str, capacity: i64) -> LightArbiter<MockStore> {
    LightArbiter::new(MockStore::with_battery(status, capacity))
}

/// Helper: current value of a register in the mock.
fn reg(arb: &LightArbiter<MockStore>, r: Register) -> String {
    arb.store().value(r).unwrap_or_default()
}

/// Helper: the breathing-LED pattern currently in the registers.
fn pattern(arb: &LightArbiter<MockStore>) -> (String, String, String, String) {
    (
        reg(arb, Register::LedChannel),
        reg(arb, Register::LedGrade),
        reg(arb, Register::LedFade),
        reg(arb, Register::LedBlinkMode),
    )
}

fn p(channel: &str, grade: &str, fade: &str, blink: &str) -> (String, String, String, String) {
    (channel.into(), grade.into(), fade.into(), blink.into())
}

// ── Test: notification → attention → clear attention → clear notification ──

#[test]
fn priority_handoff_sequence() {
    let arb = arbiter_with_battery("Discharging", 60);

    // 1. Blinking notification takes the LED
    arb.set_light(
        LightType::Notifications,
        LightState::timed(GREEN, 1000, 2000),
    );
    assert_eq!(arb.active_source(), BreathSource::Notification);
    assert_eq!(pattern(&arb), p("16", "6", "4 2 2", "3"));

    // 2. Attention pre-empts it
    arb.set_light(LightType::Attention, LightState::timed(WHITE, 250, 250));
    assert_eq!(arb.active_source(), BreathSource::Attention);
    assert_eq!(pattern(&arb), p("16", "6", "1 0 0", "3"));

    // 3. Attention clears, notification is restored
    arb.set_light(LightType::Attention, LightState::OFF);
    assert_eq!(pattern(&arb), p("16", "6", "4 2 2", "3"));

    // 4. Notification clears, dark battery turns the LED off
    arb.set_light(LightType::Notifications, LightState::OFF);
    assert_eq!(arb.active_source(), BreathSource::Battery);
    assert_eq!(pattern(&arb), p("16", "0", "0 0 0", "1"));
}

// ── Test: battery fallback reflects live charger state ──

#[test]
fn steady_battery_low_pattern() {
    let arb = arbiter_with_battery("Discharging", 8);
    arb.set_light(LightType::Battery, LightState::solid(0xFFFF_0000));
    assert_eq!(pattern(&arb), p("16", "0", "3 0 4", "3"));
}

#[test]
fn steady_battery_charging_then_full() {
    let arb = arbiter_with_battery("Charging", 42);
    let orange = LightState::solid(0xFFFF_8000);

    arb.set_light(LightType::Battery, orange);
    assert_eq!(pattern(&arb), p("16", "6", "3 0 4", "3"));

    // Same request again after the battery filled up
    arb.store().set_value(Register::BatteryCapacity, 90);
    arb.store().set_value(Register::BatteryStatus, "Full");
    arb.set_light(LightType::Battery, orange);
    assert_eq!(pattern(&arb), p("16", "6", "3 0 4", "6"));
}

#[test]
fn repeated_battery_request_rewrites_same_frame() {
    let arb = arbiter_with_battery("Charging", 70);
    let state = LightState::solid(GREEN);
    arb.set_light(LightType::Battery, state);
    let first = arb.store().take_writes();
    arb.set_light(LightType::Battery, state);
    let second = arb.store().take_writes();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn unreadable_battery_looks_discharged() {
    let arb = LightArbiter::new(MockStore::new());
    arb.set_light(LightType::Battery, LightState::solid(GREEN));
    assert_eq!(pattern(&arb), p("16", "0", "3 0 4", "3"));
}

#[test]
fn battery_hidden_while_higher_source_is_lit() {
    let arb = arbiter_with_battery("Charging", 50);
    arb.set_light(
        LightType::Notifications,
        LightState::timed(GREEN, 500, 500),
    );
    arb.store().take_writes();

    arb.set_light(LightType::Battery, LightState::solid(GREEN));
    // Notification still wins, so the battery frame is never written.
    assert!(
        !arb.store()
            .writes_to(Register::LedFade)
            .contains(&"3 0 4".to_string())
    );
    assert_eq!(arb.snapshot().battery, LightState::solid(GREEN));

    arb.set_light(LightType::Notifications, LightState::OFF);
    assert_eq!(pattern(&arb), p("16", "6", "3 0 4", "3"));
}

// ── Test: steady attention/notification keep the current pattern ──

#[test]
fn steady_notification_writes_nothing() {
    let arb = arbiter_with_battery("Charging", 50);
    arb.set_light(LightType::Battery, LightState::solid(GREEN));
    arb.store().take_writes();

    arb.set_light(LightType::Notifications, LightState::solid(WHITE));
    assert!(arb.store().writes().is_empty());
    assert_eq!(arb.active_source(), BreathSource::Notification);
}

// ── Test: alpha pre-scaling affects brightness, not ownership ──

#[test]
fn translucent_notification_dims_to_dark() {
    let arb = arbiter_with_battery("Discharging", 50);
    // alpha 1 on a dim blue rounds every channel to zero
    arb.set_light(
        LightType::Notifications,
        LightState::solid(0x0100_0080),
    );
    assert_eq!(arb.snapshot().notification.color, 0);
    assert_eq!(arb.active_source(), BreathSource::Battery);
}

// ── Test: buttons share the LED and own their own channel ──

#[test]
fn buttons_on_then_off() {
    let arb = arbiter_with_battery("Discharging", 50);

    arb.set_light(LightType::Buttons, LightState::solid(WHITE));
    assert_eq!(arb.active_source(), BreathSource::Buttons);
    assert_eq!(reg(&arb, Register::LedChannel), "8");
    assert_eq!(reg(&arb, Register::LedBrightness), "255");
    assert_eq!(reg(&arb, Register::LedBlinkMode), "6");
    assert_eq!(reg(&arb, Register::LedGrade), "8");
    assert_eq!(reg(&arb, Register::LedFade), "1 0 0");

    arb.set_light(LightType::Buttons, LightState::OFF);
    assert_eq!(arb.active_source(), BreathSource::Battery);
    assert_eq!(reg(&arb, Register::LedBrightness), "0");
    assert_eq!(pattern(&arb), p("16", "0", "0 0 0", "1"));
}

#[test]
fn notification_outranks_buttons() {
    let arb = arbiter_with_battery("Discharging", 50);
    arb.set_light(
        LightType::Notifications,
        LightState::timed(GREEN, 2000, 6000),
    );
    arb.set_light(LightType::Buttons, LightState::solid(WHITE));
    // The refresh inside the button path re-writes the notification frame.
    assert!(
        arb.store()
            .writes_to(Register::LedFade)
            .iter()
            .all(|f| f != "1 0 0")
    );
    assert_eq!(reg(&arb, Register::LedGrade), "6");
    assert_eq!(reg(&arb, Register::LedFade), "6 3 3");
}

// ── Test: backlight is independent of the breathing LED ──

#[test]
fn backlight_scales_to_panel_range() {
    let arb = arbiter_with_battery("Discharging", 50);
    arb.store().set_value(Register::BacklightMaxBrightness, 2047);
    arb.set_light(LightType::Attention, LightState::timed(WHITE, 300, 300));
    let pattern_before = pattern(&arb);

    arb.set_light(LightType::Backlight, LightState::solid(0xFF80_8080));
    assert_eq!(reg(&arb, Register::BacklightBrightness), "1027");
    assert_eq!(pattern(&arb), pattern_before);
}

// ── Test: unsupported requests ──

#[test]
fn unsupported_types_report_status() {
    let arb = arbiter_with_battery("Discharging", 50);
    assert_eq!(
        arb.set_light(LightType::Wifi, LightState::solid(WHITE)),
        Status::LightNotSupported
    );
    assert_eq!(
        arb.set_light_raw(-1, LightState::solid(WHITE)),
        Status::LightNotSupported
    );
    assert!(arb.store().writes().is_empty());
}

// ── Test: concurrent requests are serialized ──

#[test]
fn concurrent_requests_keep_frames_whole() {
    let arb = Arc::new(arbiter_with_battery("Charging", 95));
    let handles: Vec<_> = [
        (LightType::Attention, LightState::timed(WHITE, 300, 300)),
        (LightType::Notifications, LightState::timed(GREEN, 600, 600)),
        (LightType::Battery, LightState::solid(GREEN)),
        (LightType::Backlight, LightState::solid(WHITE)),
    ]
    .into_iter()
    .map(|(light, state)| {
        let arb = Arc::clone(&arb);
        thread::spawn(move || {
            for _ in 0..50 {
                assert_eq!(arb.set_light(light, state), Status::Success);
            }
        })
    })
    .collect();
    for h in handles {
        h.join().unwrap();
    }

    // Every breathing frame is four consecutive writes starting at the channel.
    let led_writes: Vec<_> = arb
        .store()
        .writes()
        .into_iter()
        .filter(|(r, _)| *r != Register::BacklightBrightness)
        .collect();
    assert_eq!(led_writes.len() % 4, 0);
    for frame in led_writes.chunks(4) {
        let regs: Vec<_> = frame.iter().map(|(r, _)| *r).collect();
        assert_eq!(
            regs,
            vec![
                Register::LedChannel,
                Register::LedGrade,
                Register::LedFade,
                Register::LedBlinkMode,
            ]
        );
    }

    // Attention was lit the whole time after its first request.
    assert_eq!(arb.active_source(), BreathSource::Attention);
    assert_eq!(pattern(&arb), p("16", "6", "2 1 1", "3"));
}

#[test]
fn concurrent_first_button_requests_initialize_once() {
    for _ in 0..20 {
        let arb = Arc::new(arbiter_with_battery("Discharging", 50));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let arb = Arc::clone(&arb);
                thread::spawn(move || {
                    assert_eq!(
                        arb.set_light(LightType::Buttons, LightState::solid(WHITE)),
                        Status::Success
                    );
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let writes = arb.store().writes();
        let parking = [
            (Register::LedFade, "0 0 0".to_string()),
            (Register::LedBlinkMode, "3".to_string()),
            (Register::LedBrightness, "0".to_string()),
        ];
        let inits = writes.windows(3).filter(|w| *w == parking).count();
        assert_eq!(inits, 1);
        assert!(arb.snapshot().buttons_initialized);
    }
}

// ── Test: real sysfs tree via config ──

#[test]
fn sysfs_tree_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let leds = dir.path().join("leds");
    let battery = dir.path().join("battery");
    let led = leds.join("nubia_led");
    let backlight = leds.join("lcd-backlight");
    for d in [&led, &backlight, &battery] {
        std::fs::create_dir_all(d).unwrap();
    }
    for node in [
        "outn",
        "grade_parameter",
        "fade_parameter",
        "blink_mode",
        "brightness",
    ] {
        std::fs::write(led.join(node), "0\n").unwrap();
    }
    std::fs::write(backlight.join("brightness"), "0\n").unwrap();
    std::fs::write(backlight.join("max_brightness"), "4095\n").unwrap();
    std::fs::write(battery.join("status"), "Charging\n").unwrap();
    std::fs::write(battery.join("capacity"), "55\n").unwrap();

    let config = Config {
        leds_dir: leds.display().to_string(),
        battery_dir: battery.display().to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
    let arb = LightArbiter::with_profile(config.store(), config.hardware_profile());

    arb.set_light(LightType::Battery, LightState::solid(GREEN));
    let read = |path: std::path::PathBuf| std::fs::read_to_string(path).unwrap();
    assert_eq!(read(led.join("outn")), "16");
    assert_eq!(read(led.join("grade_parameter")), "6");
    assert_eq!(read(led.join("fade_parameter")), "3 0 4");
    assert_eq!(read(led.join("blink_mode")), "3");

    arb.set_light(LightType::Backlight, LightState::solid(WHITE));
    assert_eq!(read(backlight.join("brightness")), "4095");
    assert_eq!(arb.store().read(Register::BacklightBrightness).unwrap(), "4095");
}
