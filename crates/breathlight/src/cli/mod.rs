//! CLI subcommands: light requests, register status, event replay.

mod config_cmd;
mod replay;
mod set;
mod status;
mod types;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use breathlight_lib::arbiter::LightArbiter;
pub(super) use breathlight_lib::config::Config;
pub(super) use breathlight_lib::encoder::{self, BatteryStatus, BreathSource};
pub(super) use breathlight_lib::error::Result;
pub(super) use breathlight_lib::profile::HardwareProfile;
pub(super) use breathlight_lib::registers::{
    self, DryRunStore, Register, RegisterStore, SysfsStore,
};
pub(super) use breathlight_lib::state::{LightState, LightType, Status};
pub(super) use breathlight_lib::BreathlightError;

const PADDING: usize = 2;

/// Options shared by every subcommand.
pub struct GlobalOpts {
    pub json: bool,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
}

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Pretty-print a JSON document to stdout.
pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| BreathlightError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{json_str}");
    Ok(())
}

// ── Config & store ──

/// Resolve the config file path: `--config` wins over the platform default.
pub(super) fn config_path(custom: Option<&Path>) -> Option<PathBuf> {
    custom.map(Path::to_path_buf).or_else(Config::path)
}

/// Load config from the resolved path, logging parse warnings.
pub(super) fn load_config(custom: Option<&Path>) -> Config {
    let Some(path) = config_path(custom) else {
        return Config::default();
    };
    let (config, warnings) = Config::load_from(&path);
    for w in &warnings {
        log::warn!("[config] {w}");
    }
    config
}

/// Load config and reject it if it does not validate.
pub(super) fn load_valid_config(custom: Option<&Path>) -> Result<Config> {
    let config = load_config(custom);
    config.validate().map_err(|errors| {
        let msgs: Vec<String> = errors.iter().map(ToString::to_string).collect();
        BreathlightError::Config(msgs.join("; "))
    })?;
    Ok(config)
}

/// Register store selected by `--dry-run`.
pub(super) enum CliStore {
    Live(SysfsStore),
    DryRun(DryRunStore<SysfsStore>),
}

impl CliStore {
    pub(super) fn open(config: &Config, dry_run: bool) -> Self {
        let store = config.store();
        if dry_run {
            CliStore::DryRun(DryRunStore::new(store))
        } else {
            CliStore::Live(store)
        }
    }

    /// Writes recorded instead of performed, when running dry.
    pub(super) fn recorded_writes(&self) -> Option<Vec<(Register, String)>> {
        match self {
            CliStore::Live(_) => None,
            CliStore::DryRun(dry) => Some(dry.writes()),
        }
    }
}

impl RegisterStore for CliStore {
    fn read(&self, reg: Register) -> registers::Result<String> {
        match self {
            CliStore::Live(s) => s.read(reg),
            CliStore::DryRun(s) => s.read(reg),
        }
    }

    fn write(&self, reg: Register, value: &str) -> registers::Result<()> {
        match self {
            CliStore::Live(s) => s.write(reg, value),
            CliStore::DryRun(s) => s.write(reg, value),
        }
    }
}

/// Arbiter over the configured hardware.
pub(super) fn open_arbiter(opts: &GlobalOpts) -> Result<LightArbiter<CliStore>> {
    let config = load_valid_config(opts.config.as_deref())?;
    let store = CliStore::open(&config, opts.dry_run);
    Ok(LightArbiter::with_profile(store, config.hardware_profile()))
}

/// Print the writes a dry run recorded.
pub(super) fn print_dry_run_writes(writes: &[(Register, String)]) {
    println!("Dry run, {} register write(s) not performed:", writes.len());
    let names: Vec<&str> = writes.iter().map(|(r, _)| r.name()).collect();
    let w = kv_width(&[], &names);
    for (reg, value) in writes {
        kv_indent(reg.name(), format_args!("{value:?}"), w);
    }
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct WriteJson {
    pub register: Register,
    pub value: String,
}

pub(super) fn writes_json(writes: Option<Vec<(Register, String)>>) -> Option<Vec<WriteJson>> {
    writes.map(|ws| {
        ws.into_iter()
            .map(|(register, value)| WriteJson { register, value })
            .collect()
    })
}

#[derive(Serialize)]
pub(super) struct SetOutput {
    pub light: LightType,
    pub status: Status,
    pub state: LightStateJson,
    pub active_source: BreathSource,
    pub dry_run_writes: Option<Vec<WriteJson>>,
}

#[derive(Serialize)]
pub(super) struct LightStateJson {
    pub color: String,
    pub flash_mode: breathlight_lib::state::FlashMode,
    pub flash_on_ms: i32,
    pub flash_off_ms: i32,
    pub luma: u32,
}

impl From<&LightState> for LightStateJson {
    fn from(s: &LightState) -> Self {
        LightStateJson {
            color: encoder::format_color(s.color),
            flash_mode: s.flash_mode,
            flash_on_ms: s.flash_on_ms,
            flash_off_ms: s.flash_off_ms,
            luma: encoder::luma(s.color),
        }
    }
}

#[derive(Serialize)]
pub(super) struct TypesOutput {
    pub supported: Vec<TypeJson>,
    pub unsupported: Vec<TypeJson>,
}

#[derive(Serialize)]
pub(super) struct TypeJson {
    pub name: &'static str,
    pub id: i32,
}

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub profile: String,
    pub registers: Vec<RegisterJson>,
    pub battery: BatteryJson,
}

#[derive(Serialize)]
pub(super) struct RegisterJson {
    pub register: Register,
    pub path: String,
    pub value: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub(super) struct BatteryJson {
    pub charging: bool,
    pub capacity: i64,
    pub indication: encoder::BatteryIndication,
}

#[derive(Serialize)]
pub(super) struct ReplayOutput {
    pub applied: usize,
    pub interrupted: bool,
    pub events: Vec<ReplayStepJson>,
    pub dry_run_writes: Option<Vec<WriteJson>>,
}

#[derive(Serialize)]
pub(super) struct ReplayStepJson {
    pub line: usize,
    pub light: LightType,
    pub status: Status,
    pub active_source: BreathSource,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub profile: HardwareProfile,
    pub validation_errors: Vec<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send one light request (e.g. `set notifications --color green --on 300 --off 3000`)
    Set {
        /// Light type name or platform id (attention, notifications, battery, buttons, backlight)
        light: String,
        /// Color: #RRGGBB, #AARRGGBB or a name (red, green, blue, white, off, ...)
        #[arg(long, default_value = "white")]
        color: String,
        /// Blink on-duration in milliseconds (requires --off)
        #[arg(long, requires = "off")]
        on: Option<i32>,
        /// Blink off-duration in milliseconds (requires --on)
        #[arg(long, requires = "on")]
        off: Option<i32>,
    },

    /// List supported light types in priority order
    Types,

    /// Read back every register and the live battery state
    Status,

    /// Apply JSON-lines light events in order through one arbiter
    Replay {
        /// Event file, or `-` for stdin
        file: String,
        /// Pause between events in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,
    },

    /// Show current configuration and file paths
    Config {
        /// Write a default config file to the config path
        #[arg(long)]
        init: bool,
        /// Overwrite an existing file with `--init`
        #[arg(long, requires = "init")]
        force: bool,
    },
}

/// Warn if `--dry-run` was passed to a command that never writes.
fn warn_dry_run_unused(cmd_name: &str) {
    log::warn!("--dry-run has no effect on `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, opts: &GlobalOpts) -> Result<()> {
    match cmd {
        Command::Set {
            light,
            color,
            on,
            off,
        } => set::cmd_set(&light, &color, on.zip(off), opts),
        Command::Types => {
            if opts.dry_run {
                warn_dry_run_unused("types");
            }
            types::cmd_types(opts.json)
        }
        Command::Status => {
            if opts.dry_run {
                warn_dry_run_unused("status");
            }
            status::cmd_status(opts)
        }
        Command::Replay { file, interval_ms } => replay::cmd_replay(&file, interval_ms, opts),
        Command::Config { init, force } => {
            if opts.dry_run {
                warn_dry_run_unused("config");
            }
            if init {
                config_cmd::cmd_config_init(force, opts.config.as_deref())
            } else {
                config_cmd::cmd_config(opts.json, opts.config.as_deref())
            }
        }
    }
}
