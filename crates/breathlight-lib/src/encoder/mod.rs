//! Hardware encoding: light states to discrete register values.

mod color;
mod frame;
mod timing;

pub use color::{format_color, luma, parse_color, scale_by_alpha};
pub use frame::{
    BatteryIndication, BatteryStatus, BreathSource, FADE_IDLE, LedFrame, backlight_level,
    battery_frame, encode_breathing,
};
pub use timing::{ALWAYS_ON, BreathTiming, flash_durations, quantize_off, quantize_on};
