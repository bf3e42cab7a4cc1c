//! `status` subcommand: read back every register and the live battery state.

use super::{
    BatteryJson, BatteryStatus, GlobalOpts, HardwareProfile, Register, RegisterJson,
    RegisterStore, Result, StatusOutput, SysfsStore, kv, kv_indent, kv_width, load_valid_config,
    print_json,
};

/// Read each register once, keeping failures alongside values.
fn collect_registers(store: &SysfsStore) -> Vec<RegisterJson> {
    Register::ALL
        .iter()
        .map(|&reg| {
            let path = store.layout().path_for(reg).display().to_string();
            match store.read(reg) {
                Ok(value) => RegisterJson {
                    register: reg,
                    path,
                    value: Some(value),
                    error: None,
                },
                Err(e) => RegisterJson {
                    register: reg,
                    path,
                    value: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect()
}

/// Battery condition from already-read registers, same defaults as the arbiter.
fn battery_from(registers: &[RegisterJson], profile: &HardwareProfile) -> BatteryJson {
    let value = |reg: Register| {
        registers
            .iter()
            .find(|r| r.register == reg)
            .and_then(|r| r.value.clone())
            .unwrap_or_default()
    };
    let capacity = value(Register::BatteryCapacity).parse().unwrap_or(0);
    let battery = BatteryStatus::from_raw(&value(Register::BatteryStatus), capacity);
    BatteryJson {
        charging: battery.charging,
        capacity: battery.capacity,
        indication: battery.indication(profile),
    }
}

pub(super) fn cmd_status(opts: &GlobalOpts) -> Result<()> {
    let config = load_valid_config(opts.config.as_deref())?;
    let profile = config.hardware_profile();
    // Status only reads, so it always uses the live store.
    let store = config.store();
    let registers = collect_registers(&store);
    let battery = battery_from(&registers, &profile);

    if opts.json {
        return print_json(&StatusOutput {
            version: env!("CARGO_PKG_VERSION").to_string(),
            profile: profile.name.clone(),
            registers,
            battery,
        });
    }

    let names: Vec<&str> = Register::ALL.iter().map(|r| r.name()).collect();
    let w = kv_width(&["Version:", "Profile:", "Registers:", "Battery:"], &names)
        .max(kv_width(&[], &["Charging:", "Capacity:", "Indication:"]));

    kv("Version:", env!("CARGO_PKG_VERSION"), w);
    kv("Profile:", &profile.name, w);
    println!();

    println!("Registers:");
    for r in &registers {
        match (&r.value, &r.error) {
            (Some(v), _) => kv_indent(r.register.name(), format_args!("{v:<12}{}", r.path), w),
            (None, Some(e)) => kv_indent(r.register.name(), format_args!("(unavailable: {e})"), w),
            (None, None) => kv_indent(r.register.name(), "(unavailable)", w),
        }
    }
    println!();

    println!("Battery:");
    kv_indent("Charging:", battery.charging, w);
    kv_indent("Capacity:", format_args!("{}%", battery.capacity), w);
    kv_indent("Indication:", format_args!("{:?}", battery.indication), w);
    Ok(())
}
