//! Raw paint values to the canonical color model.
//!
//! Checked in order:
//!
//! 1. `none`, `transparent`, `currentColor`, empty: [`NormalizedColor::Unspecified`]
//! 2. `url(#id)`, quoted or not: gradient reference
//! 3. `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! 4. `rgb()` / `rgba()`
//! 5. `hsl()` / `hsla()`
//! 6. named colors (fixed table, then the full CSS set via lightningcss)
//!
//! Anything else is `None`: the channel is treated as having no color.

use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;

use super::{Hex8, named};
use crate::debug;

/// Result of normalizing a paint value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedColor {
    Hex(Hex8),
    /// Customizable placeholder; renders black.
    Unspecified,
    Gradient(GradientRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GradientRef {
    /// Local reference to the element with this id.
    Id(String),
    /// A `url()` payload that does not name a local element (external
    /// resource, empty target). Kept as written, never customized.
    Uncustomizable(String),
}

/// Normalize a raw `fill` / `stroke` / `stop-color` value.
pub fn normalize(raw: &str) -> Option<NormalizedColor> {
    let value = raw.trim();
    let lower = value.to_ascii_lowercase();

    if matches!(lower.as_str(), "" | "none" | "transparent" | "currentcolor") {
        return Some(NormalizedColor::Unspecified);
    }

    if lower.starts_with("url(") {
        return Some(NormalizedColor::Gradient(parse_url(value)));
    }

    let color = if let Some(digits) = lower.strip_prefix('#') {
        parse_hex(digits)
    } else if let Some((name, args)) = color_function(&lower) {
        let args = split_args(args);
        match name {
            "rgb" | "rgba" => parse_rgb(&args),
            _ => parse_hsl(&args),
        }
    } else {
        named::lookup(&lower).or_else(|| css_color(value))
    };

    if color.is_none() {
        debug!("normalize"; "unsupported color syntax `{}`", raw);
    }
    color.map(NormalizedColor::Hex)
}

/// Target of a `url(…)` paint.
///
/// `url(#id)`, `url('#id')` and `url("#id")` name local element `id`;
/// anything else is uncustomizable.
pub fn parse_url(raw: &str) -> GradientRef {
    let uncustomizable = || GradientRef::Uncustomizable(raw.trim().to_string());

    let value = raw.trim();
    let Some(open) = value.find('(') else {
        return uncustomizable();
    };
    let Some(close) = value.rfind(')') else {
        return uncustomizable();
    };
    if close < open {
        return uncustomizable();
    }

    let inner = value[open + 1..close].trim();
    let inner = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(inner)
        .trim();

    match inner.strip_prefix('#') {
        Some(id) if !id.is_empty() && !id.contains(char::is_whitespace) => {
            GradientRef::Id(id.to_string())
        }
        _ => uncustomizable(),
    }
}

fn parse_hex(digits: &str) -> Option<Hex8> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    match digits.len() {
        3 => Some(Hex8::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Hex8::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Hex8::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Hex8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// `rgb(…)`, `rgba(…)`, `hsl(…)`, `hsla(…)` split into name and argument list.
fn color_function(lower: &str) -> Option<(&str, &str)> {
    let (name, rest) = lower.split_once('(')?;
    let name = name.trim_end();
    let args = rest.strip_suffix(')')?;
    (matches!(name, "rgb" | "rgba" | "hsl" | "hsla") && !args.contains(['(', ')']))
        .then_some((name, args))
}

/// Function arguments separated by commas, whitespace or `/`.
fn split_args(args: &str) -> Vec<&str> {
    args.split([',', ' ', '\t', '\r', '\n', '/'])
        .filter(|arg| !arg.is_empty())
        .collect()
}

fn parse_rgb(args: &[&str]) -> Option<Hex8> {
    if !matches!(args.len(), 3 | 4) {
        return None;
    }
    let channel = |arg: &str| -> Option<u8> {
        let value = match arg.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 2.55,
            None => arg.parse::<f64>().ok()?,
        };
        value.is_finite().then(|| value.clamp(0.0, 255.0).round() as u8)
    };

    let color = Hex8::opaque(channel(args[0])?, channel(args[1])?, channel(args[2])?);
    match args.get(3) {
        Some(alpha) => Some(color.with_alpha(parse_alpha(alpha)?)),
        None => Some(color),
    }
}

fn parse_hsl(args: &[&str]) -> Option<Hex8> {
    if !matches!(args.len(), 3 | 4) {
        return None;
    }
    let hue = args[0]
        .strip_suffix("deg")
        .unwrap_or(args[0])
        .parse::<f64>()
        .ok()?;
    let percent = |arg: &str| arg.strip_suffix('%').unwrap_or(arg).parse::<f64>().ok();
    let (saturation, lightness) = (percent(args[1])?, percent(args[2])?);
    if !(hue.is_finite() && saturation.is_finite() && lightness.is_finite()) {
        return None;
    }

    let color = Hex8::from_hsl([hue, saturation, lightness], 255);
    match args.get(3) {
        Some(alpha) => Some(color.with_alpha(parse_alpha(alpha)?)),
        None => Some(color),
    }
}

/// `0.5` or `50%`, clamped to `[0, 1]`.
fn parse_alpha(arg: &str) -> Option<f64> {
    let value = match arg.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? / 100.0,
        None => arg.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

/// Full CSS color grammar (remaining named colors, modern syntaxes).
fn css_color(value: &str) -> Option<Hex8> {
    let color = CssColor::parse_string(value).ok()?;
    match color.to_rgb().ok()? {
        CssColor::RGBA(rgba) => Some(
            Hex8::opaque(rgba.red, rgba.green, rgba.blue).with_alpha(f64::from(rgba.alpha)),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(raw: &str) -> String {
        match normalize(raw) {
            Some(NormalizedColor::Hex(color)) => color.to_string(),
            other => panic!("{raw} -> {other:?}"),
        }
    }

    #[test]
    fn test_unspecified_keywords() {
        for raw in ["none", "transparent", "currentColor", "CURRENTCOLOR", "", "  "] {
            assert_eq!(normalize(raw), Some(NormalizedColor::Unspecified), "{raw:?}");
        }
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(hex("#abc"), "#AABBCCFF");
        assert_eq!(hex("#abcd"), "#AABBCCDD");
        assert_eq!(hex("#aabbcc"), "#AABBCCFF");
        assert_eq!(hex("#aabbccdd"), "#AABBCCDD");
        assert_eq!(hex(" #FF0000 "), "#FF0000FF");
        assert_eq!(normalize("#abcde"), None);
        assert_eq!(normalize("#ggg"), None);
    }

    #[test]
    fn test_rgb_forms() {
        assert_eq!(hex("rgb(1,2,3)"), "#010203FF");
        assert_eq!(hex("rgba(1,2,3,0.5)"), "#01020380");
        assert_eq!(hex("rgb(255 0 0 / 50%)"), "#FF000080");
        assert_eq!(hex("RGB(100%, 0%, 0%)"), "#FF0000FF");
        assert_eq!(hex("rgb(300, -5, 0)"), "#FF0000FF");
        assert_eq!(normalize("rgb(1,2)"), None);
        assert_eq!(normalize("rgb(a,b,c)"), None);
    }

    #[test]
    fn test_hsl_forms() {
        assert_eq!(hex("hsl(120,50%,50%)"), "#40BF40FF");
        assert_eq!(hex("hsla(0, 100%, 50%, 0.5)"), "#FF000080");
        assert_eq!(hex("hsl(240deg 100% 50%)"), "#0000FFFF");
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(hex("red"), "#FF0000FF");
        assert_eq!(hex("Green"), "#008000FF");
        assert_eq!(hex("rebeccapurple"), "#663399FF");
        assert_eq!(normalize("not-a-color"), None);
    }

    #[test]
    fn test_url_references() {
        let id = |s: &str| Some(NormalizedColor::Gradient(GradientRef::Id(s.to_string())));
        assert_eq!(normalize("url(#g1)"), id("g1"));
        assert_eq!(normalize("url('#g1')"), id("g1"));
        assert_eq!(normalize("url(\"#g1\")"), id("g1"));
        assert_eq!(normalize(" URL( #g1 ) "), id("g1"));

        for raw in ["url(pattern.svg#p)", "url()", "url(#)", "url(#a"] {
            assert!(
                matches!(
                    normalize(raw),
                    Some(NormalizedColor::Gradient(GradientRef::Uncustomizable(_)))
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_normalization_is_total() {
        let inputs = [
            "#abc",
            "#aabbcc",
            "#aabbccdd",
            "rgb(1,2,3)",
            "rgba(1,2,3,0.5)",
            "hsl(120,50%,50%)",
            "red",
            "none",
            "transparent",
            "url(#g1)",
        ];
        for raw in inputs {
            match normalize(raw) {
                Some(NormalizedColor::Hex(color)) => {
                    assert_eq!(color.to_string().parse::<Hex8>().unwrap(), color);
                }
                Some(NormalizedColor::Unspecified | NormalizedColor::Gradient(_)) => {}
                None => panic!("{raw} did not normalize"),
            }
        }
        for junk in ["(", ")", "#", "url", "rgb(", "hsl()", "🎨", "\u{0}"] {
            let _ = normalize(junk);
        }
    }
}
