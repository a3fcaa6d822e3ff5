/// RGBA colors shared by the effect and the software canvas
use std::fmt;
use std::str::FromStr;

use crate::error::ColorParseError;

/// An 8-bit per channel, non-premultiplied RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Source-over composite of `self` onto `dst`
    pub fn over(self, dst: Rgba) -> Rgba {
        let sa = self.a as u32;
        let inv = 255 - sa;
        let channel = |s: u8, d: u8| ((s as u32 * sa + d as u32 * inv + 127) / 255) as u8;
        Rgba {
            r: channel(self.r, dst.r),
            g: channel(self.g, dst.g),
            b: channel(self.b, dst.b),
            a: ((sa * 255 + dst.a as u32 * inv + 127) / 255) as u8,
        }
    }

    /// Linear interpolation between two colors, `t` in [0, 1]
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    /// Accepts `r,g,b`, `r,g,b,a`, `#rrggbb` and `#rrggbbaa`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let channels = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u8>()
                    .map_err(|_| ColorParseError::InvalidChannel(part.trim().to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        match channels.as_slice() {
            [r, g, b] => Ok(Rgba::opaque(*r, *g, *b)),
            [r, g, b, a] => Ok(Rgba::new(*r, *g, *b, *a)),
            other => Err(ColorParseError::ChannelCount(other.len())),
        }
    }
}

fn parse_hex(hex: &str) -> Result<Rgba, ColorParseError> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(ColorParseError::InvalidHex(hex.to_string()));
    }
    let byte = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| ColorParseError::InvalidHex(hex.to_string()))
    };
    let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
    Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, alpha))
}
