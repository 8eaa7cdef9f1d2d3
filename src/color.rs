// accentctl/src/color.rs
// Hex color parsing and the byte orders Windows expects for accent values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, ThemeError};

/// Hover feedback factor used by the swatch grid.
pub const HOVER_DARKEN_FACTOR: f32 = 0.85;

/// 24-bit RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Strict parse: exactly `#` plus 6 ASCII hex digits.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[0] != b'#' || !bytes[1..].iter().all(u8::is_ascii_hexdigit) {
            return Err(ThemeError::InvalidColorFormat(s.to_string()));
        }

        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16)
            .map_err(|_| ThemeError::InvalidColorFormat(s.to_string()));
        Ok(Self::new(channel(1)?, channel(3)?, channel(5)?))
    }

    /// Naive `0x00RRGGBB` packing.
    pub fn to_rgb_value(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// `0x00BBGGRR`, the order DWORD color fields in the registry use.
    pub fn to_packed_value(self) -> u32 {
        (u32::from(self.b) << 16) | (u32::from(self.g) << 8) | u32::from(self.r)
    }

    /// One `AccentPalette` entry: B, G, R, then the alpha byte.
    pub fn to_palette_bytes(self, alpha: u8) -> [u8; 4] {
        [self.b, self.g, self.r, alpha]
    }

    /// Swap the red and blue hex pairs.
    pub fn reverse_channels(self) -> Self {
        Self::new(self.b, self.g, self.r)
    }

    /// Scale every channel by `factor` (clamped to `0.0..=1.0`), flooring.
    pub fn darken(self, factor: f32) -> Self {
        let factor = if factor.is_nan() { 1.0 } else { factor.clamp(0.0, 1.0) };
        let scale = |c: u8| (f32::from(c) * factor).floor().clamp(0.0, f32::from(c)) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(serde::de::Error::custom)
    }
}
