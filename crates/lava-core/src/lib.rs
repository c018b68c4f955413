//! Core types shared by the lava crates.

mod easing;

pub use easing::Easing;

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A position expressed as fractions of the drawing surface.
///
/// Each axis is expected to lie in `[0, 1]`; the renderer scales it by the
/// surface width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation from `self` to `other` by weight `t`.
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Whether both axes lie in the closed unit interval.
    pub fn is_normalized(self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// An opaque 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(0xFF, 0x3B, 0x30);
    pub const BLUE: Rgb = Rgb::new(0x00, 0x7A, 0xFF);
    pub const YELLOW: Rgb = Rgb::new(0xFF, 0xCC, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Build a color from unit channels, clamping out-of-range values.
    pub fn from_unit([r, g, b]: [f32; 3]) -> Self {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(quantize(r), quantize(g), quantize(b))
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

/// Error returned when a `#RRGGBB` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected #RRGGBB")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRgbError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseRgbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

/// Circle colors and the color they are composited over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// One circle is created per entry, in order. Duplicates are allowed.
    pub colors: Vec<Rgb>,
    pub background: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![Rgb::RED, Rgb::BLUE, Rgb::YELLOW, Rgb::RED],
            background: Rgb::BLACK,
        }
    }
}

/// Animation tunables, in milliseconds and raster pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// How long a move from old to new positions takes.
    pub transition_ms: u64,
    /// How often new target positions are chosen.
    pub tick_ms: u64,
    /// Blur radius applied to the composited circles.
    pub blur_radius: f32,
    /// Curve applied to the transition progress.
    pub easing: Easing,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            transition_ms: 4000,
            tick_ms: 3000,
            blur_radius: 12.0,
            easing: Easing::EaseInOut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parse_and_display() {
        let rgb: Rgb = "#FF3B30".parse().unwrap();
        assert_eq!(rgb, Rgb::RED);
        assert_eq!(rgb.to_string(), "#FF3B30");
        assert_eq!("#007aff".parse::<Rgb>().unwrap(), Rgb::BLUE);
    }

    #[test]
    fn test_rgb_parse_rejects_garbage() {
        assert!("FF3B30".parse::<Rgb>().is_err());
        assert!("#FF3B3".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
        assert!("#ÿÿÿ".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_rgb_unit_conversion() {
        assert_eq!(Rgb::from_unit(Rgb::YELLOW.to_unit()), Rgb::YELLOW);
        assert_eq!(Rgb::from_unit([2.0, -1.0, 0.5]), Rgb::new(255, 0, 128));
    }

    #[test]
    fn test_rgb_into_ratatui_color() {
        assert_eq!(Color::from(Rgb::BLUE), Color::Rgb(0, 122, 255));
    }

    #[test]
    fn test_default_palette_duplicates_red() {
        let palette = Palette::default();
        assert_eq!(palette.colors.len(), 4);
        assert_eq!(palette.colors[0], palette.colors[3]);
        assert_eq!(palette.background, Rgb::BLACK);
    }

    #[test]
    fn test_palette_serde() {
        let palette: Palette =
            toml::from_str("colors = [\"#000001\", \"#FFFFFF\"]\nbackground = \"#101010\"")
                .unwrap();
        assert_eq!(palette.colors, vec![Rgb::new(0, 0, 1), Rgb::new(255, 255, 255)]);
        assert_eq!(palette.background, Rgb::new(16, 16, 16));
    }

    #[test]
    fn test_point_lerp() {
        let a = Point::new(0.0, 1.0);
        let b = Point::new(1.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(0.5, 0.5));
        assert!(a.lerp(b, 0.25).is_normalized());
        assert!(!Point::new(1.5, 0.0).is_normalized());
    }
}
