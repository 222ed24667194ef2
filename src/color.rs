use crate::types::Rgb;

/// Clamps an opacity reading into `[0, 1]`. Unreadable values count as fully opaque.
pub fn clamp_alpha(value: f64) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Lenient hex parsing: leading `#` optional, `#rgb` shorthand expanded,
/// otherwise the leading run of hex digits is read and its low 24 bits kept
/// (so `#dededed3` reads as `de de d3`). `None` when no digit is present.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let hex = hex.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let expanded: String;
    let digits = if hex.len() == 3 {
        expanded = hex.chars().flat_map(|c| [c, c]).collect();
        expanded.as_str()
    } else {
        hex
    };

    let mut value: u32 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(16) else { break };
        value = ((value << 4) | d) & 0xFF_FFFF;
        seen = true;
    }
    if !seen {
        return None;
    }
    Some(Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

/// Strict `#rgb` / `#rrggbb` parsing, case-insensitive.
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let digits = value.strip_prefix('#')?;
    if !(digits.len() == 3 || digits.len() == 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    hex_to_rgb(value)
}

/// Scales each channel by `factor`, flooring and capping at 255.
pub fn adjust_brightness(color: Rgb, factor: f64) -> Rgb {
    let scale = |c: u8| (c as f64 * factor).floor().clamp(0.0, 255.0) as u8;
    Rgb::new(scale(color.r), scale(color.g), scale(color.b))
}

/// Clamps a float channel into a byte, flooring like the canvas string parser.
pub fn channel(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.floor().clamp(0.0, 255.0) as u8
    }
}
