//! Color parsing, formatting and brightness reduction.
//!
//! Colors use the platform format `0xAARRGGBB`.

/// Parse a color string into `0xAARRGGBB`.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"0xFF0000"` (opaque), `"#80FF0000"` (with alpha)
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`, `"purple"`, `"cyan"`
/// - `"off"` / `"black"` → `0`
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0xFFFF_0000),
        "green" => return Ok(0xFF00_FF00),
        "blue" => return Ok(0xFF00_00FF),
        "white" => return Ok(0xFFFF_FFFF),
        "orange" => return Ok(0xFFFF_8000),
        "yellow" => return Ok(0xFFFF_FF00),
        "purple" => return Ok(0xFF80_00FF),
        "cyan" => return Ok(0xFF00_FFFF),
        "off" | "black" => return Ok(0x0000_0000),
        _ => {}
    }

    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let invalid = || {
        crate::BreathlightError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, #AARRGGBB or a color name)"
        ))
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    match hex.len() {
        6 => Ok(0xFF00_0000 | u32::from_str_radix(hex, 16).map_err(|_| invalid())?),
        8 => u32::from_str_radix(hex, 16).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Format a color as `#AARRGGBB`.
pub fn format_color(color: u32) -> String {
    format!("#{color:08X}")
}

/// Reduce the RGB part of a color to the single luma value the hardware uses.
pub fn luma(color: u32) -> u32 {
    let r = (color >> 16) & 0xFF;
    let g = (color >> 8) & 0xFF;
    let b = color & 0xFF;
    (77 * r + 150 * g + 29 * b) >> 8
}

/// Fold a partial alpha into the RGB channels.
///
/// Alpha strictly between 0 and 255 scales each channel by `alpha / 255`
/// and yields a color with alpha 0. Fully transparent or fully opaque
/// colors are returned unchanged.
pub fn scale_by_alpha(color: u32) -> u32 {
    let alpha = color >> 24;
    if alpha == 0 || alpha == 0xFF {
        return color;
    }
    let scale = |c: u32| c * alpha / 0xFF;
    let r = scale((color >> 16) & 0xFF);
    let g = scale((color >> 8) & 0xFF);
    let b = scale(color & 0xFF);
    (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_color ──

    #[test]
    fn parse_named() {
        assert_eq!(parse_color("red").unwrap(), 0xFFFF_0000);
        assert_eq!(parse_color("green").unwrap(), 0xFF00_FF00);
        assert_eq!(parse_color("blue").unwrap(), 0xFF00_00FF);
        assert_eq!(parse_color("white").unwrap(), 0xFFFF_FFFF);
    }

    #[test]
    fn parse_named_off() {
        assert_eq!(parse_color("off").unwrap(), 0);
        assert_eq!(parse_color("black").unwrap(), 0);
    }

    #[test]
    fn parse_named_case_insensitive() {
        assert_eq!(parse_color("RED").unwrap(), 0xFFFF_0000);
        assert_eq!(parse_color("  Red  ").unwrap(), 0xFFFF_0000);
    }

    #[test]
    fn parse_rgb_hex_is_opaque() {
        assert_eq!(parse_color("#FF0000").unwrap(), 0xFFFF_0000);
        assert_eq!(parse_color("00ff00").unwrap(), 0xFF00_FF00);
        assert_eq!(parse_color("0x0000FF").unwrap(), 0xFF00_00FF);
    }

    #[test]
    fn parse_argb_hex_keeps_alpha() {
        assert_eq!(parse_color("#80FF0000").unwrap(), 0x80FF_0000);
        assert_eq!(parse_color("00FFFFFF").unwrap(), 0x00FF_FFFF);
    }

    #[test]
    fn parse_invalid() {
        assert!(parse_color("#FFF").is_err());
        assert!(parse_color("#FF00000").is_err());
        assert!(parse_color("#GGHHII").is_err());
        assert!(parse_color("#+FFFFF").is_err());
        assert!(parse_color("chartreuse").is_err());
    }

    // ── format_color ──

    #[test]
    fn format_pads_to_eight_digits() {
        assert_eq!(format_color(0xFFFF_0000), "#FFFF0000");
        assert_eq!(format_color(0x0000_00FF), "#000000FF");
        assert_eq!(format_color(0), "#00000000");
    }

    #[test]
    fn parse_accepts_formatted() {
        let c = parse_color("#AB12CD").unwrap();
        assert_eq!(parse_color(&format_color(c)).unwrap(), c);
    }

    // ── luma ──

    #[test]
    fn luma_primaries() {
        assert_eq!(luma(0x00FF_0000), 76);
        assert_eq!(luma(0x0000_FF00), 149);
        assert_eq!(luma(0x0000_00FF), 28);
        assert_eq!(luma(0x00FF_FFFF), 255);
    }

    #[test]
    fn luma_ignores_alpha() {
        assert_eq!(luma(0xFFFF_FFFF), 255);
        assert_eq!(luma(0xFF00_0000), 0);
    }

    #[test]
    fn luma_dim_color_rounds_to_zero() {
        // 29 * 1 >> 8 == 0: lit but dark
        assert_eq!(luma(0x0000_0001), 0);
    }

    // ── scale_by_alpha ──

    #[test]
    fn half_alpha_scales_channels() {
        assert_eq!(scale_by_alpha(0x80FF_0000), 0x0080_0000);
        assert_eq!(scale_by_alpha(0x80FF_FFFF), 0x0080_8080);
    }

    #[test]
    fn opaque_and_transparent_unchanged() {
        assert_eq!(scale_by_alpha(0xFFFF_0000), 0xFFFF_0000);
        assert_eq!(scale_by_alpha(0x00FF_0000), 0x00FF_0000);
    }

    #[test]
    fn low_alpha_can_extinguish() {
        assert_eq!(scale_by_alpha(0x0101_0101), 0);
    }
}
