//! Canonical RRGGBBAA color and HSL math.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How [`Hex8::to_css`] writes a color back into a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexStyle {
    /// `#RRGGBB` when fully opaque, `#RRGGBBAA` otherwise.
    #[default]
    Auto,
    /// Always `#RRGGBBAA`.
    Long,
}

/// An 8-bit RGBA color, displayed as `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hex8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a #RRGGBB or #RRGGBBAA color")]
pub struct ParseHexError(pub String);

impl Hex8 {
    /// Render color of an unspecified paint.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Alpha as a fraction in `[0, 1]`.
    #[inline]
    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    #[inline]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: unit_to_u8(alpha),
            ..self
        }
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn rgb_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Paint value to write into a document.
    pub fn to_css(self, style: HexStyle) -> String {
        match style {
            HexStyle::Auto if self.a == 255 => self.rgb_hex(),
            _ => self.to_string(),
        }
    }

    /// Hue in degrees `[0, 360)`, saturation and lightness in percent.
    pub fn to_hsl(self) -> [f64; 3] {
        // rapidtables rgb-to-hsl
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let c_max = r.max(g).max(b);
        let c_min = r.min(g).min(b);
        let delta = c_max - c_min;
        let delta = if delta.abs() < 1e-9 { 0.0 } else { delta };

        let h = if delta == 0.0 {
            0.0
        } else if r == c_max {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if g == c_max {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        let l = (c_max + c_min) / 2.0;
        let s = if delta == 0.0 {
            0.0
        } else {
            delta / (1.0 - (2.0 * l - 1.0).abs())
        };

        [h, s * 100.0, l * 100.0]
    }

    /// Build from hue in degrees and saturation/lightness in percent.
    pub fn from_hsl(hsl: [f64; 3], a: u8) -> Self {
        // rapidtables hsl-to-rgb
        let h = hsl[0].rem_euclid(360.0);
        let s = (hsl[1] / 100.0).clamp(0.0, 1.0);
        let l = (hsl[2] / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = if h < 60.0 {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        Self {
            r: unit_to_u8(r + m),
            g: unit_to_u8(g + m),
            b: unit_to_u8(b + m),
            a,
        }
    }

    /// Rotate hue, shift saturation/lightness (clamped to `[0, 100]`), then
    /// shift alpha by `alpha / 100` (clamped to `[0, 1]`).
    ///
    /// A zero hue/saturation/lightness delta leaves the RGB channels
    /// untouched, so zero deltas never introduce rounding drift.
    #[must_use]
    pub fn shift(self, hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let mut out = self;
        if hue != 0.0 || saturation != 0.0 || lightness != 0.0 {
            let [h, s, l] = self.to_hsl();
            out = Self::from_hsl(
                [
                    (h + hue).rem_euclid(360.0),
                    (s + saturation).clamp(0.0, 100.0),
                    (l + lightness).clamp(0.0, 100.0),
                ],
                self.a,
            );
        }
        if alpha != 0.0 {
            out = out.with_alpha((out.alpha() + alpha / 100.0).clamp(0.0, 1.0));
        }
        out
    }
}

#[inline]
fn unit_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl fmt::Display for Hex8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// Strict canonical form: `#RRGGBBAA` or `#RRGGBB`.
impl FromStr for Hex8 {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseHexError(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(err)?;
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<String> for Hex8 {
    type Error = ParseHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hex8> for String {
    fn from(value: Hex8) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Hex8, b: Hex8) -> bool {
        a.r.abs_diff(b.r) <= 1 && a.g.abs_diff(b.g) <= 1 && a.b.abs_diff(b.b) <= 1 && a.a == b.a
    }

    #[test]
    fn test_display_and_parse() {
        let color = Hex8::new(0xAA, 0xBB, 0xCC, 0x80);
        assert_eq!(color.to_string(), "#AABBCC80");
        assert_eq!("#aabbcc80".parse::<Hex8>().unwrap(), color);
        assert_eq!("#AABBCC".parse::<Hex8>().unwrap(), Hex8::opaque(0xAA, 0xBB, 0xCC));
        assert!("#abc".parse::<Hex8>().is_err());
        assert!("AABBCC".parse::<Hex8>().is_err());
        assert!("#GGBBCC".parse::<Hex8>().is_err());
    }

    #[test]
    fn test_to_css() {
        let red = Hex8::opaque(255, 0, 0);
        assert_eq!(red.to_css(HexStyle::Auto), "#FF0000");
        assert_eq!(red.to_css(HexStyle::Long), "#FF0000FF");
        assert_eq!(red.with_alpha(0.5).to_css(HexStyle::Auto), "#FF000080");
    }

    #[test]
    fn test_hsl_roundtrip() {
        for color in [
            Hex8::opaque(255, 0, 0),
            Hex8::opaque(0, 128, 0),
            Hex8::opaque(18, 52, 86),
            Hex8::opaque(250, 240, 230),
            Hex8::opaque(128, 128, 128),
        ] {
            let back = Hex8::from_hsl(color.to_hsl(), color.a);
            assert!(close(back, color), "{color} -> {back}");
        }
    }

    #[test]
    fn test_from_hsl_known_values() {
        assert_eq!(Hex8::from_hsl([120.0, 50.0, 50.0], 255), Hex8::opaque(64, 191, 64));
        assert_eq!(Hex8::from_hsl([0.0, 0.0, 100.0], 255), Hex8::opaque(255, 255, 255));
        assert_eq!(Hex8::from_hsl([240.0, 100.0, 50.0], 255), Hex8::opaque(0, 0, 255));
    }

    #[test]
    fn test_shift_zero_is_identity() {
        let color = Hex8::new(18, 52, 86, 200);
        assert_eq!(color.shift(0.0, 0.0, 0.0, 0.0), color);
    }

    #[test]
    fn test_shift_hue_wraps() {
        let red = Hex8::opaque(255, 0, 0);
        assert_eq!(red.shift(120.0, 0.0, 0.0, 0.0), Hex8::opaque(0, 255, 0));
        assert_eq!(red.shift(-120.0, 0.0, 0.0, 0.0), Hex8::opaque(0, 0, 255));
        assert_eq!(red.shift(360.0, 0.0, 0.0, 0.0), red);
    }

    #[test]
    fn test_shift_clamps_saturation_and_lightness() {
        let red = Hex8::opaque(255, 0, 0);
        assert_eq!(red.shift(0.0, 0.0, 100.0, 0.0), Hex8::opaque(255, 255, 255));
        assert_eq!(red.shift(0.0, 0.0, -100.0, 0.0), Hex8::opaque(0, 0, 0));
        let gray = red.shift(0.0, -100.0, 0.0, 0.0);
        assert_eq!((gray.r, gray.g, gray.b), (128, 128, 128));
    }

    #[test]
    fn test_shift_alpha_clamps() {
        let red = Hex8::opaque(255, 0, 0);
        assert_eq!(red.shift(0.0, 0.0, 0.0, -50.0).a, 128);
        assert_eq!(red.shift(0.0, 0.0, 0.0, 50.0).a, 255);
        assert_eq!(red.shift(0.0, 0.0, 0.0, -100.0).a, 0);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Hex8::opaque(0, 255, 0)).unwrap();
        assert_eq!(json, "\"#00FF00FF\"");
        let back: Hex8 = serde_json::from_str("\"#00ff0080\"").unwrap();
        assert_eq!(back, Hex8::new(0, 255, 0, 128));
        assert!(serde_json::from_str::<Hex8>("\"red\"").is_err());
    }
}
