//! Colours, measurement units and enumerated style values.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `RRGGBB` or `AARRGGBB`, optionally prefixed with `#`.
static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").unwrap());

/// EMUs per inch (English Metric Units).
pub const EMU_PER_INCH: f64 = 914_400.0;

/// An ARGB colour stored as eight upper-case hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(String);

impl Color {
    pub const BLACK: &'static str = "FF000000";
    pub const WHITE: &'static str = "FFFFFFFF";

    /// Parse `RRGGBB` (opaque) or `AARRGGBB`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let caps = HEX_COLOR_REGEX.captures(hex.trim())?;
        let digits = caps[1].to_uppercase();
        if digits.len() == 6 {
            Some(Self(format!("FF{}", digits)))
        } else {
            Some(Self(digits))
        }
    }

    pub fn black() -> Self {
        Self(Self::BLACK.to_string())
    }

    /// Eight-digit `AARRGGBB` form.
    pub fn argb(&self) -> &str {
        &self.0
    }

    /// Six-digit `RRGGBB` form, dropping alpha.
    pub fn rgb(&self) -> &str {
        &self.0[2..]
    }

    /// Alpha channel, 0-255.
    pub fn alpha(&self) -> u8 {
        u8::from_str_radix(&self.0[..2], 16).unwrap_or(0xFF)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Units accepted for custom layout dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "EMU", alias = "emu")]
    Emu,
    #[serde(rename = "centimeter", alias = "cm")]
    Centimeter,
    #[serde(rename = "millimeter", alias = "mm")]
    Millimeter,
    #[serde(rename = "inch", alias = "in")]
    Inch,
    #[serde(rename = "pixel", alias = "px")]
    Pixel,
    #[serde(rename = "point", alias = "pt")]
    Point,
}

impl Unit {
    /// Parse a unit name as used in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "emu" => Some(Self::Emu),
            "centimeter" | "cm" => Some(Self::Centimeter),
            "millimeter" | "mm" => Some(Self::Millimeter),
            "inch" | "in" => Some(Self::Inch),
            "pixel" | "px" => Some(Self::Pixel),
            "point" | "pt" => Some(Self::Point),
            _ => None,
        }
    }

    /// Number of EMUs in one of this unit.
    pub fn emu_factor(self) -> f64 {
        match self {
            Self::Emu => 1.0,
            Self::Centimeter => 360_000.0,
            Self::Millimeter => 36_000.0,
            Self::Inch => EMU_PER_INCH,
            // 96 dpi
            Self::Pixel => 9_525.0,
            Self::Point => 12_700.0,
        }
    }

    /// Convert a value in this unit to whole EMUs.
    pub fn to_emu(self, value: f64) -> i64 {
        (value * self.emu_factor()).round() as i64
    }

    /// Convert whole EMUs to this unit.
    pub fn from_emu(self, emu: i64) -> f64 {
        emu as f64 / self.emu_factor()
    }
}

/// Underline style of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
}

impl Underline {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "single" | "sng" => Ok(Self::Single),
            "double" | "dbl" => Ok(Self::Double),
            _ => Err(Error::invalid_value("font", "underline", "none, single or double")),
        }
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "center" | "ctr" => Ok(Self::Center),
            "right" | "r" => Ok(Self::Right),
            "justify" | "just" => Ok(Self::Justify),
            _ => Err(Error::invalid_value(
                "shape",
                "alignment",
                "left, center, right or justify",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_six_digits_is_opaque() {
        let color = Color::from_hex("ff8800").unwrap();
        assert_eq!(color.argb(), "FFFF8800");
        assert_eq!(color.rgb(), "FF8800");
        assert_eq!(color.alpha(), 255);
    }

    #[test]
    fn test_color_with_alpha_and_hash() {
        let color = Color::from_hex("#80112233").unwrap();
        assert_eq!(color.argb(), "80112233");
        assert_eq!(color.alpha(), 0x80);
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!(Color::from_hex("red").is_none());
        assert!(Color::from_hex("12345").is_none());
    }

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Unit::Inch.to_emu(10.0), 9_144_000);
        assert_eq!(Unit::Centimeter.to_emu(2.54), 914_400);
        assert_eq!(Unit::Pixel.to_emu(96.0), 914_400);
        assert_eq!(Unit::Point.to_emu(72.0), 914_400);
        assert_eq!(Unit::Emu.to_emu(42.0), 42);
        assert!((Unit::Inch.from_emu(914_400) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unit_from_name() {
        assert_eq!(Unit::from_name("EMU"), Some(Unit::Emu));
        assert_eq!(Unit::from_name("Millimeter"), Some(Unit::Millimeter));
        assert_eq!(Unit::from_name("furlong"), None);
    }

    #[test]
    fn test_enumerated_names() {
        assert_eq!(Underline::from_name("Double").unwrap(), Underline::Double);
        assert!(Underline::from_name("wavy").is_err());
        assert_eq!(Alignment::from_name("ctr").unwrap(), Alignment::Center);
    }
}
