//! `config` subcommand: show current configuration and file paths, or write defaults.

use std::path::Path;

use super::{
    BreathlightError, Config, ConfigOutput, Result, config_path, kv, kv_indent, kv_width,
    load_config, print_json,
};

/// Write the default config to the resolved path.
pub(super) fn cmd_config_init(force: bool, custom_path: Option<&Path>) -> Result<()> {
    let path = config_path(custom_path)
        .ok_or_else(|| BreathlightError::Config("no config directory".into()))?;
    if path.exists() && !force {
        return Err(BreathlightError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(&path)?;
    log::info!("wrote default config to {}", path.display());
    println!("Wrote {}", path.display());
    Ok(())
}

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = load_config(custom_path);
    let path = config_path(custom_path);
    let exists = path.as_ref().is_some_and(|p| p.exists());
    let profile = config.hardware_profile();
    let validation_errors: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };

    if json {
        return print_json(&ConfigOutput {
            config_file: path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: exists,
            settings: config,
            profile,
            validation_errors,
        });
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:"],
        &[
            "leds_dir:",
            "indicator_led:",
            "backlight_led:",
            "battery_dir:",
            "Profile:",
            "Channels:",
            "Grades:",
            "Blink modes:",
            "Battery fade:",
            "Button fade:",
            "Full at:",
            "Backlight max:",
        ],
    );

    match &path {
        Some(p) if exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("leds_dir:", &config.leds_dir, w);
    kv_indent("indicator_led:", &config.indicator_led, w);
    kv_indent("backlight_led:", &config.backlight_led, w);
    kv_indent("battery_dir:", &config.battery_dir, w);
    println!();

    println!("Hardware profile:");
    kv_indent("Profile:", &profile.name, w);
    kv_indent(
        "Channels:",
        format_args!("home={} button={}", profile.channels.home, profile.channels.button),
        w,
    );
    let g = &profile.grades;
    kv_indent(
        "Grades:",
        format_args!(
            "button={} home={} battery_low={} notification={} battery={}",
            g.button, g.home, g.battery_low, g.notification, g.battery
        ),
        w,
    );
    let b = &profile.blink;
    kv_indent(
        "Blink modes:",
        format_args!(
            "off={} on={} breath={} breath_once={}",
            b.off, b.on, b.breath, b.breath_once
        ),
        w,
    );
    kv_indent("Battery fade:", format_args!("{:?}", profile.battery_fade), w);
    kv_indent("Button fade:", format_args!("{:?}", profile.button_fade), w);
    kv_indent("Full at:", format_args!("{}%", profile.full_capacity), w);
    kv_indent("Backlight max:", profile.default_max_backlight, w);

    if !validation_errors.is_empty() {
        println!();
        println!("Problems:");
        for e in &validation_errors {
            println!("  {e}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_config_without_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(cmd_config(false, Some(&path)).is_ok());
        assert!(cmd_config(true, Some(&path)).is_ok());
    }

    #[test]
    fn cmd_config_invalid_file_still_shows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config {
            indicator_led: "a/b".into(),
            ..Config::default()
        }
        .save_to(&path)
        .unwrap();
        assert!(cmd_config(false, Some(&path)).is_ok());
    }

    #[test]
    fn init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        cmd_config_init(false, Some(&path)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# breathlight configuration"));
        let (loaded, warnings) = Config::load_from(&path);
        assert!(warnings.is_empty());
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "indicator_led = \"custom\"\n").unwrap();

        let err = cmd_config_init(false, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(Config::load_from(&path).0.indicator_led, "custom");

        cmd_config_init(true, Some(&path)).unwrap();
        assert_eq!(Config::load_from(&path).0, Config::default());
    }
}
