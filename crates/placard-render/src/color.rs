//! Chat text colors.
//!
//! Supports two color forms:
//!
//! - Named colors: the sixteen classic chat colors (`red`, `dark_aqua`, `gold`, ...),
//!   each with a legacy format code (`&c`, `&3`, `&6`, ...)
//! - RGB hex: `"#ff6b35"` or `"#fff"` (3 or 6 digit)
//!
//! # Example
//!
//! ```rust
//! use placard_render::color::{NamedColor, TextColor};
//!
//! assert_eq!(TextColor::parse("Gold"), Ok(TextColor::Named(NamedColor::Gold)));
//! assert_eq!(TextColor::parse("#ff5555").map(|c| c.nearest_named()), Ok(NamedColor::Red));
//! ```

use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// One of the sixteen named chat colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    pub const ALL: [NamedColor; 16] = [
        NamedColor::Black,
        NamedColor::DarkBlue,
        NamedColor::DarkGreen,
        NamedColor::DarkAqua,
        NamedColor::DarkRed,
        NamedColor::DarkPurple,
        NamedColor::Gold,
        NamedColor::Gray,
        NamedColor::DarkGray,
        NamedColor::Blue,
        NamedColor::Green,
        NamedColor::Aqua,
        NamedColor::Red,
        NamedColor::LightPurple,
        NamedColor::Yellow,
        NamedColor::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::DarkBlue => "dark_blue",
            NamedColor::DarkGreen => "dark_green",
            NamedColor::DarkAqua => "dark_aqua",
            NamedColor::DarkRed => "dark_red",
            NamedColor::DarkPurple => "dark_purple",
            NamedColor::Gold => "gold",
            NamedColor::Gray => "gray",
            NamedColor::DarkGray => "dark_gray",
            NamedColor::Blue => "blue",
            NamedColor::Green => "green",
            NamedColor::Aqua => "aqua",
            NamedColor::Red => "red",
            NamedColor::LightPurple => "light_purple",
            NamedColor::Yellow => "yellow",
            NamedColor::White => "white",
        }
    }

    /// The legacy format code character (`0`-`9`, `a`-`f`).
    pub fn code(self) -> char {
        const CODES: &[u8; 16] = b"0123456789abcdef";
        CODES[self as usize] as char
    }

    pub fn from_code(code: char) -> Option<NamedColor> {
        let index = code.to_digit(16)?;
        NamedColor::ALL.get(index as usize).copied()
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            NamedColor::Black => (0x00, 0x00, 0x00),
            NamedColor::DarkBlue => (0x00, 0x00, 0xaa),
            NamedColor::DarkGreen => (0x00, 0xaa, 0x00),
            NamedColor::DarkAqua => (0x00, 0xaa, 0xaa),
            NamedColor::DarkRed => (0xaa, 0x00, 0x00),
            NamedColor::DarkPurple => (0xaa, 0x00, 0xaa),
            NamedColor::Gold => (0xff, 0xaa, 0x00),
            NamedColor::Gray => (0xaa, 0xaa, 0xaa),
            NamedColor::DarkGray => (0x55, 0x55, 0x55),
            NamedColor::Blue => (0x55, 0x55, 0xff),
            NamedColor::Green => (0x55, 0xff, 0x55),
            NamedColor::Aqua => (0x55, 0xff, 0xff),
            NamedColor::Red => (0xff, 0x55, 0x55),
            NamedColor::LightPurple => (0xff, 0x55, 0xff),
            NamedColor::Yellow => (0xff, 0xff, 0x55),
            NamedColor::White => (0xff, 0xff, 0xff),
        }
    }

    /// Looks up a color by name, accepting `grey` spellings.
    pub fn from_name(name: &str) -> Option<NamedColor> {
        NAMES.get(name.to_ascii_lowercase().as_str()).copied()
    }
}

static NAMES: Lazy<HashMap<&'static str, NamedColor>> = Lazy::new(|| {
    let mut names: HashMap<&'static str, NamedColor> =
        NamedColor::ALL.iter().map(|c| (c.name(), *c)).collect();
    names.insert("grey", NamedColor::Gray);
    names.insert("dark_grey", NamedColor::DarkGray);
    names
});

/// A resolved text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

impl TextColor {
    /// Parses a color name or hex code.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        NamedColor::from_name(s)
            .map(TextColor::Named)
            .ok_or_else(|| format!("Unknown color name: {}", s))
    }

    /// Parses a hex color code (without the # prefix).
    fn parse_hex(hex: &str) -> Result<Self, String> {
        let digit = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|d| u8::from_str_radix(d, 16).ok())
                .ok_or_else(|| format!("Invalid hex: {}", hex))
        };

        match hex.len() {
            // 3-digit hex: #rgb -> #rrggbb
            3 => Ok(TextColor::Rgb(
                digit(0..1)? * 17,
                digit(1..2)? * 17,
                digit(2..3)? * 17,
            )),
            6 => Ok(TextColor::Rgb(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
            _ => Err(format!(
                "Invalid hex color: #{} (must be 3 or 6 digits)",
                hex
            )),
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            TextColor::Named(named) => named.rgb(),
            TextColor::Rgb(r, g, b) => (r, g, b),
        }
    }

    /// `#rrggbb` form, regardless of how the color was written.
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// The named color closest to this one in RGB space.
    pub fn nearest_named(self) -> NamedColor {
        if let TextColor::Named(named) = self {
            return named;
        }
        let (r, g, b) = self.rgb();
        let distance = |c: &NamedColor| {
            let (cr, cg, cb) = c.rgb();
            let dr = r as i32 - cr as i32;
            let dg = g as i32 - cg as i32;
            let db = b as i32 - cb as i32;
            dr * dr + dg * dg + db * db
        };
        NamedColor::ALL
            .iter()
            .copied()
            .min_by_key(distance)
            .unwrap_or(NamedColor::White)
    }
}

impl fmt::Display for TextColor {
    /// Named colors print their name, RGB colors print `#rrggbb`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextColor::Named(named) => f.write_str(named.name()),
            TextColor::Rgb(..) => f.write_str(&self.to_hex()),
        }
    }
}

impl Serialize for TextColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TextColor {
    /// Reads the same forms as [`TextColor::parse`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TextColor::parse(&raw).map_err(de::Error::custom)
    }
}
