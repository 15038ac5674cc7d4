//! Fixed table of common CSS color names.

use super::Hex8;

const NAMED: &[(&str, Hex8)] = &[
    ("black", Hex8::opaque(0x00, 0x00, 0x00)),
    ("white", Hex8::opaque(0xFF, 0xFF, 0xFF)),
    ("red", Hex8::opaque(0xFF, 0x00, 0x00)),
    ("green", Hex8::opaque(0x00, 0x80, 0x00)),
    ("blue", Hex8::opaque(0x00, 0x00, 0xFF)),
    ("yellow", Hex8::opaque(0xFF, 0xFF, 0x00)),
    ("cyan", Hex8::opaque(0x00, 0xFF, 0xFF)),
    ("aqua", Hex8::opaque(0x00, 0xFF, 0xFF)),
    ("magenta", Hex8::opaque(0xFF, 0x00, 0xFF)),
    ("fuchsia", Hex8::opaque(0xFF, 0x00, 0xFF)),
    ("gray", Hex8::opaque(0x80, 0x80, 0x80)),
    ("grey", Hex8::opaque(0x80, 0x80, 0x80)),
    ("orange", Hex8::opaque(0xFF, 0xA5, 0x00)),
    ("purple", Hex8::opaque(0x80, 0x00, 0x80)),
    ("pink", Hex8::opaque(0xFF, 0xC0, 0xCB)),
    ("brown", Hex8::opaque(0xA5, 0x2A, 0x2A)),
    ("navy", Hex8::opaque(0x00, 0x00, 0x80)),
    ("teal", Hex8::opaque(0x00, 0x80, 0x80)),
    ("lime", Hex8::opaque(0x00, 0xFF, 0x00)),
    ("maroon", Hex8::opaque(0x80, 0x00, 0x00)),
    ("olive", Hex8::opaque(0x80, 0x80, 0x00)),
    ("silver", Hex8::opaque(0xC0, 0xC0, 0xC0)),
    ("gold", Hex8::opaque(0xFF, 0xD7, 0x00)),
];

/// Look up a lowercase color name.
pub fn lookup(name: &str) -> Option<Hex8> {
    NAMED
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, color)| *color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("green"), Some(Hex8::opaque(0, 128, 0)));
        assert_eq!(lookup("grey"), lookup("gray"));
        assert_eq!(lookup("rebeccapurple"), None);
    }
}
