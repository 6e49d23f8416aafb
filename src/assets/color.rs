use serde::{Deserialize, Serialize};
use std::fmt;

/// Straight (non-premultiplied) RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional, case-insensitive).
    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        if s.len() != 6 || !s.is_ascii() {
            return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
        }
        Ok(Self::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    }

    /// Lenient parse used wherever a palette entry feeds compositing math: anything that is
    /// not a `#RRGGBB` triple degrades to black instead of failing the render.
    pub fn from_hex_or_black(s: &str) -> Self {
        Self::parse_hex(s).unwrap_or(Self::BLACK)
    }

    /// `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Attach an alpha channel, clamped to `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            rgb: self,
            alpha: clamp_unit(alpha),
        }
    }
}

/// An RGB color plus straight alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub rgb: Rgb8,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb8 { r, g, b } = self.rgb;
        write!(f, "rgba({r}, {g}, {b}, {})", self.alpha)
    }
}

/// Clamp into `[0, 1]`; NaN maps to 0.
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
