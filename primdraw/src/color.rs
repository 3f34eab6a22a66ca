use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An 8-bit RGBA color.
///
/// Parsed from CSS-style strings: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
/// and a handful of named colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a color string.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let s = input.trim();
        let invalid = || Error::InvalidColor(input.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let part = |from: usize, len: usize| {
                u8::from_str_radix(&hex[from..from + len], 16).map_err(|_| invalid())
            };
            let color = match hex.len() {
                3 => Self::rgb(part(0, 1)? * 17, part(1, 1)? * 17, part(2, 1)? * 17),
                4 => Self::rgba(
                    part(0, 1)? * 17,
                    part(1, 1)? * 17,
                    part(2, 1)? * 17,
                    part(3, 1)? * 17,
                ),
                6 => Self::rgb(part(0, 2)?, part(2, 2)?, part(4, 2)?),
                8 => Self::rgba(part(0, 2)?, part(2, 2)?, part(4, 2)?, part(6, 2)?),
                _ => return Err(invalid()),
            };
            return Ok(color);
        }

        named(&s.to_ascii_lowercase()).ok_or_else(invalid)
    }

    /// Color as an `image` pixel.
    pub fn to_rgba8(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

fn named(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "lime" => Color::rgb(0, 255, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "transparent" => Color::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Color {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
