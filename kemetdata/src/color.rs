use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A flat RGB color used to tag a region in the hitbox raster.
///
/// The canonical text form is `#RRGGBB` with uppercase hex digits, which is
/// what every comparison against catalog entries goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitboxColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 6 hex digits, got {0:?}")]
    Length(String),
    #[error("invalid hex digits in {0:?}")]
    Digits(String),
}

impl HitboxColor {
    /// Reserved background color: pixels with no region.
    pub const BLACK: HitboxColor = HitboxColor { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from an RGBA pixel. Alpha is ignored.
    pub fn from_channels([r, g, b, _alpha]: [u8; 4]) -> Self {
        Self { r, g, b }
    }

    pub fn is_background(&self) -> bool {
        *self == Self::BLACK
    }

    /// Canonical `#RRGGBB` form.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HitboxColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for HitboxColor {
    type Err = ColorParseError;

    /// Accepts `#RRGGBB` or `RRGGBB`, digits in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError::Length(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError::Digits(s.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl Serialize for HitboxColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
