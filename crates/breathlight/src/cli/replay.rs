//! `replay` subcommand: apply a recorded sequence of light requests.
//!
//! Input is JSON lines, one request per line:
//!
//! ```text
//! {"type": "notifications", "color": "#FF00FF00", "on_ms": 300, "off_ms": 3000}
//! {"type": "attention", "color": "red"}
//! {"type": 5, "color": "off"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. All events go
//! through a single arbiter, so priorities play out exactly as they would
//! on the device.

use std::io::BufRead;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde::Deserialize;

use super::{
    BreathlightError, GlobalOpts, LightState, LightType, RUNNING, ReplayOutput, ReplayStepJson,
    Result, encoder, open_arbiter, print_dry_run_writes, print_json, writes_json,
};
use breathlight_lib::state::{BrightnessMode, FlashMode};

/// Light type as written in an event: a name or a numeric platform id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeField {
    Id(i32),
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventLine {
    #[serde(rename = "type")]
    light: TypeField,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    on_ms: Option<i32>,
    #[serde(default)]
    off_ms: Option<i32>,
    /// Defaults to `timed` when both durations are given.
    #[serde(default)]
    flash_mode: Option<FlashMode>,
    #[serde(default)]
    brightness_mode: BrightnessMode,
}

/// One parsed request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct LightEvent {
    pub line: usize,
    pub light: LightType,
    pub state: LightState,
}

/// Parse a single event line. Returns `Ok(None)` for blank and comment lines.
pub(super) fn parse_event(line_no: usize, line: &str) -> Result<Option<LightEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let err = |msg: String| BreathlightError::Event(format!("line {line_no}: {msg}"));

    let raw: EventLine = serde_json::from_str(line).map_err(|e| err(e.to_string()))?;
    let light = match raw.light {
        TypeField::Id(id) => LightType::from_id(id),
        TypeField::Name(name) => name.parse().ok(),
    }
    .ok_or_else(|| err("unknown light type".into()))?;

    let color = match raw.color.as_deref() {
        Some(c) => encoder::parse_color(c).map_err(|e| err(e.to_string()))?,
        None => 0,
    };

    let (flash_on_ms, flash_off_ms) = match (raw.on_ms, raw.off_ms) {
        (Some(on), Some(off)) => (on, off),
        (None, None) => (0, 0),
        _ => return Err(err("on_ms and off_ms must be given together".into())),
    };
    let flash_mode = raw.flash_mode.unwrap_or(if raw.on_ms.is_some() {
        FlashMode::Timed
    } else {
        FlashMode::None
    });

    Ok(Some(LightEvent {
        line: line_no,
        light,
        state: LightState {
            color,
            flash_mode,
            flash_on_ms,
            flash_off_ms,
            brightness_mode: raw.brightness_mode,
        },
    }))
}

/// Parse every event up front so a malformed file applies nothing.
pub(super) fn parse_events(reader: impl BufRead) -> Result<Vec<LightEvent>> {
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(event) = parse_event(i + 1, &line?)? {
            events.push(event);
        }
    }
    Ok(events)
}

fn read_events(file: &str) -> Result<Vec<LightEvent>> {
    if file == "-" {
        parse_events(std::io::stdin().lock())
    } else {
        let f = std::fs::File::open(file).map_err(|e| {
            BreathlightError::Event(format!("cannot open event file {file}: {e}"))
        })?;
        parse_events(std::io::BufReader::new(f))
    }
}

pub(super) fn cmd_replay(file: &str, interval_ms: u64, opts: &GlobalOpts) -> Result<()> {
    let events = read_events(file)?;
    let arbiter = open_arbiter(opts)?;
    log::info!("replaying {} event(s) from {file}", events.len());

    let mut steps = Vec::with_capacity(events.len());
    let mut interrupted = false;
    for (i, event) in events.iter().enumerate() {
        if !RUNNING.load(Ordering::SeqCst) {
            interrupted = true;
            break;
        }
        if i > 0 && interval_ms > 0 {
            std::thread::sleep(Duration::from_millis(interval_ms));
        }

        let status = arbiter.set_light(event.light, event.state);
        let active = arbiter.active_source();
        if !opts.json {
            println!(
                "[{:>3}] {:<13} {} -> {status} (LED owner: {active:?})",
                event.line,
                event.light.name(),
                encoder::format_color(event.state.color),
            );
        }
        steps.push(ReplayStepJson {
            line: event.line,
            light: event.light,
            status,
            active_source: active,
        });
    }

    let writes = arbiter.store().recorded_writes();
    if opts.json {
        return print_json(&ReplayOutput {
            applied: steps.len(),
            interrupted,
            events: steps,
            dry_run_writes: writes_json(writes),
        });
    }

    if interrupted {
        println!("Interrupted after {} of {} event(s).", steps.len(), events.len());
    }
    if let Some(writes) = &writes {
        println!();
        print_dry_run_writes(writes);
    }
    Ok(())
}
