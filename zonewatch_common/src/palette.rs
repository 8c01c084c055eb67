//! Deterministic class-label colors, stable across runs: hash the label
//! to an HSL hue at full saturation and 50% lightness, then convert to
//! RGB for the overlay drawing code.

use image::Rgb;

/// Hue for a class label, in [0, 360).
///
/// Reproduces the widely used `c + (hash << 5) - hash` string hash with
/// 32-bit shift coercion, so the same label always lands on the same
/// color.
pub fn class_hue(label: &str) -> f32 {
    let mut hash: i64 = 0;
    for unit in label.encode_utf16() {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        hash = unit as i64 + shifted - hash;
    }
    (hash % 360).abs() as f32
}

/// Stroke color for a class label.
pub fn color_for_class(label: &str) -> Rgb<u8> {
    hsl_to_rgb(class_hue(label), 1.0, 0.5)
}

/// HSL to RGB. `hue` in degrees, `saturation`/`lightness` in [0, 1].
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb<u8> {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb([
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    ])
}
