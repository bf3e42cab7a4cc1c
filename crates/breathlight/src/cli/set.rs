//! `set` subcommand: send one light request through the arbiter.

use super::{
    BreathlightError, GlobalOpts, LightState, LightStateJson, LightType, Result, SetOutput,
    Status, encoder, kv, kv_width, open_arbiter, print_dry_run_writes, print_json, writes_json,
};

/// Build the requested state from CLI arguments.
pub(super) fn build_state(color: &str, blink: Option<(i32, i32)>) -> Result<LightState> {
    let color = encoder::parse_color(color)?;
    Ok(match blink {
        Some((on, off)) => LightState::timed(color, on, off),
        None => LightState::solid(color),
    })
}

pub(super) fn cmd_set(
    light: &str,
    color: &str,
    blink: Option<(i32, i32)>,
    opts: &GlobalOpts,
) -> Result<()> {
    let light: LightType = light.parse()?;
    let state = build_state(color, blink)?;
    let arbiter = open_arbiter(opts)?;

    let status = arbiter.set_light(light, state);
    let active = arbiter.active_source();
    let writes = arbiter.store().recorded_writes();

    if opts.json {
        print_json(&SetOutput {
            light,
            status,
            state: LightStateJson::from(&state),
            active_source: active,
            dry_run_writes: writes_json(writes),
        })?;
    } else {
        let w = kv_width(&["Light:", "Color:", "Blink:", "Status:", "LED owner:"], &[]);
        kv("Light:", format_args!("{light} (id {})", light.id()), w);
        kv(
            "Color:",
            format_args!(
                "{} (luma {})",
                encoder::format_color(state.color),
                encoder::luma(state.color)
            ),
            w,
        );
        match blink {
            Some((on, off)) => kv("Blink:", format_args!("{on} ms on / {off} ms off"), w),
            None => kv("Blink:", "none", w),
        }
        kv("Status:", status, w);
        kv("LED owner:", format_args!("{active:?}"), w);
        if let Some(writes) = &writes {
            println!();
            print_dry_run_writes(writes);
        }
    }

    match status {
        Status::Success => Ok(()),
        Status::LightNotSupported => Err(BreathlightError::Event(format!(
            "light type {light} is not supported on this device"
        ))),
    }
}
