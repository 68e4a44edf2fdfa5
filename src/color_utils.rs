// File: ./src/color_utils.rs
// Hex color parsing for flash message backgrounds. No UI crate dependencies,
// so the result can be mapped to whatever the front end draws with.

/// Parse "#RRGGBB" or "RRGGBB" into a u8 tuple. Shorter strings, or a
/// "#RGB" shorthand, are expanded when possible.
pub fn parse_hex_to_u8(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        n if n >= 6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Determines if text on top of this color should be white rather than black.
pub fn is_dark(r: u8, g: u8, b: u8) -> bool {
    // Perceptual luminance approximation
    let brightness = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    brightness < 128.0
}
