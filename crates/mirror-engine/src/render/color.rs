//! RGBA colors for draw commands.
//! Serialized as CSS color strings so the canvas host can use them directly.

use std::fmt;

use serde::{Serialize, Serializer};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const DEEP_SKY_BLUE: Color = Color::rgb(0, 191, 255);
    pub const HOT_PINK: Color = Color::rgb(255, 0, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha taken from a 0..1 opacity.
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fill color for a target worth `points`.
/// 100 red, 90 orange, 80 yellow, 70 green, 60 cyan, 50 blue,
/// 40 violet, 30 magenta, anything lower green.
pub fn target_color(points: u32) -> Color {
    match points {
        100 => Color::rgb(0xFF, 0x00, 0x00),
        90 => Color::rgb(0xFF, 0x77, 0x00),
        80 => Color::rgb(0xFF, 0xFF, 0x00),
        70 => Color::rgb(0x00, 0xFF, 0x00),
        60 => Color::rgb(0x00, 0xFF, 0xFF),
        50 => Color::rgb(0x00, 0x00, 0xFF),
        40 => Color::rgb(0x77, 0x00, 0xFF),
        30 => Color::rgb(0xFF, 0x00, 0xFF),
        _ => Color::rgb(0x00, 0xFF, 0x00),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_color_formats_as_hex() {
        assert_eq!(Color::rgb(255, 119, 0).to_string(), "#FF7700");
    }

    #[test]
    fn translucent_color_formats_as_rgba() {
        assert_eq!(Color::BLACK.with_opacity(0.7).to_string(), "rgba(0, 0, 0, 0.702)");
    }

    #[test]
    fn point_table_is_fixed() {
        assert_eq!(target_color(100).to_string(), "#FF0000");
        assert_eq!(target_color(90).to_string(), "#FF7700");
        assert_eq!(target_color(80).to_string(), "#FFFF00");
        assert_eq!(target_color(70).to_string(), "#00FF00");
        assert_eq!(target_color(60).to_string(), "#00FFFF");
        assert_eq!(target_color(50).to_string(), "#0000FF");
        assert_eq!(target_color(40).to_string(), "#7700FF");
        assert_eq!(target_color(30).to_string(), "#FF00FF");
        assert_eq!(target_color(20).to_string(), "#00FF00");
        assert_eq!(target_color(10).to_string(), "#00FF00");
    }

    #[test]
    fn serializes_as_css_string() {
        let json = serde_json::to_string(&Color::WHITE).unwrap();
        assert_eq!(json, "\"#FFFFFF\"");
    }
}
