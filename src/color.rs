use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Class colors
// ---------------------------------------------------------------------------

/// Placeholder color for codes outside the catalog.
pub const UNKNOWN_COLOR: Color32 = Color32::BLACK;

/// Parse a `#rrggbb` hex string into a [`Color32`].
///
/// The leading `#` is optional; shorthand (`#rgb`) is not accepted because the
/// catalog never uses it.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

/// Deterministic fallback color for a catalog entry that carries no hex color.
///
/// Golden-angle hue spacing keeps nearby codes visually distinct.
pub fn fallback_color(code: u16) -> Color32 {
    let hue = (code as f32 * 137.508) % 360.0;
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
