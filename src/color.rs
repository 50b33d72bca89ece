//! Fill colors: hex (#RGB, #RGBA, #RRGGBB, #RRGGBBAA) and a few named colors.

use core::fmt;
use core::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

/// sRGB color with alpha, 8 bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl FillColor {
    /// Dark gray standing in for an empty desktop (20% gray).
    pub const DESKTOP: Self = Self::opaque(51, 51, 51);

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn black() -> Self {
        Self::opaque(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::opaque(255, 255, 255)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self::DESKTOP
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error returned for an unparseable color string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}")]
pub struct ParseColorError(String);

impl FromStr for FillColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl TryFrom<String> for FillColor {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FillColor> for String {
    fn from(c: FillColor) -> Self {
        c.to_hex()
    }
}

/// Parse a hex or named color. The leading `#` is optional.
pub fn parse_color(s: &str) -> Option<FillColor> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if let Some(c) = parse_hex(hex) {
        return Some(c);
    }

    lookup_named(s)
}

fn parse_hex(hex: &str) -> Option<FillColor> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let b = hex.as_bytes();
    match hex.len() {
        3 => Some(FillColor::opaque(
            expand_nibble(b[0])?,
            expand_nibble(b[1])?,
            expand_nibble(b[2])?,
        )),
        4 => Some(FillColor {
            r: expand_nibble(b[0])?,
            g: expand_nibble(b[1])?,
            b: expand_nibble(b[2])?,
            a: expand_nibble(b[3])?,
        }),
        6 => Some(FillColor::opaque(
            parse_byte(&b[0..2])?,
            parse_byte(&b[2..4])?,
            parse_byte(&b[4..6])?,
        )),
        8 => Some(FillColor {
            r: parse_byte(&b[0..2])?,
            g: parse_byte(&b[2..4])?,
            b: parse_byte(&b[4..6])?,
            a: parse_byte(&b[6..8])?,
        }),
        _ => None,
    }
}

/// 'f' → 0xFF, 'a' → 0xAA.
fn expand_nibble(ch: u8) -> Option<u8> {
    let n = hex_val(ch)?;
    Some(n << 4 | n)
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn parse_byte(pair: &[u8]) -> Option<u8> {
    Some(hex_val(pair[0])? << 4 | hex_val(pair[1])?)
}

fn lookup_named(name: &str) -> Option<FillColor> {
    let lower = name.to_ascii_lowercase();
    NAMED_COLORS
        .binary_search_by_key(&lower.as_str(), |&(n, _)| n)
        .ok()
        .map(|idx| {
            let [r, g, b, a] = NAMED_COLORS[idx].1;
            FillColor { r, g, b, a }
        })
}

/// Sorted alphabetically for binary search.
const NAMED_COLORS: &[(&str, [u8; 4])] = &[
    ("black", [0, 0, 0, 255]),
    ("darkgray", [169, 169, 169, 255]),
    ("darkslategray", [47, 79, 79, 255]),
    ("desktop", [51, 51, 51, 255]),
    ("dimgray", [105, 105, 105, 255]),
    ("gray", [128, 128, 128, 255]),
    ("midnightblue", [25, 25, 112, 255]),
    ("navy", [0, 0, 128, 255]),
    ("silver", [192, 192, 192, 255]),
    ("transparent", [0, 0, 0, 0]),
    ("white", [255, 255, 255, 255]),
];
