// Pixel maps are authored in flat colours, so every lookup in this crate is an
// exact component comparison. Channels are stored as decoded 8-bit values;
// "full intensity" means 255.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// An RGBA colour used as an exact lookup key.
///
/// Serialized as a hex string (`"#rrggbbaa"`) so mapping tables stay readable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorKey {
    pub const TRANSPARENT: ColorKey = ColorKey::rgba(0, 0, 0, 0);
    pub const BLACK: ColorKey = ColorKey::rgb(0, 0, 0);
    pub const WHITE: ColorKey = ColorKey::rgb(255, 255, 255);
    pub const RED: ColorKey = ColorKey::rgb(255, 0, 0);
    pub const GREEN: ColorKey = ColorKey::rgb(0, 255, 0);
    pub const BLUE: ColorKey = ColorKey::rgb(0, 0, 255);
    pub const YELLOW: ColorKey = ColorKey::rgb(255, 255, 0);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque colour.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert normalised `[0, 1]` floats to 8-bit channels (clamped, rounded).
    pub fn from_f32(c: [f32; 4]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r: q(c[0]), g: q(c[1]), b: q(c[2]), a: q(c[3]) }
    }

    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Alpha of exactly zero. Such pixels never produce placements.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    #[inline]
    pub fn is_full(channel: u8) -> bool {
        channel == u8::MAX
    }
}

impl From<[u8; 4]> for ColorKey {
    fn from(c: [u8; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

impl From<image::Rgba<u8>> for ColorKey {
    fn from(p: image::Rgba<u8>) -> Self {
        Self::from(p.0)
    }
}

// ── Hex text form ─────────────────────────────────────────────────────────────

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Accepts `rrggbb` or `rrggbbaa`, with or without a leading `#`.
/// Six-digit forms are opaque.
impl FromStr for ColorKey {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MapError::invalid(format!("bad colour '{s}': expected #rrggbb or #rrggbbaa")));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| MapError::invalid(format!("bad colour '{s}': non-hex digit")))
        };

        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl From<ColorKey> for String {
    fn from(c: ColorKey) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for ColorKey {
    type Error = MapError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
