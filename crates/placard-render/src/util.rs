//! Color conversion helpers for terminal output.

use crate::color::{NamedColor, TextColor};

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
///
/// # Example
///
/// ```rust
/// use placard_render::rgb_to_ansi256;
///
/// // Pure red maps to ANSI 196
/// assert_eq!(rgb_to_ansi256((255, 0, 0)), 196);
///
/// // Pure green maps to ANSI 46
/// assert_eq!(rgb_to_ansi256((0, 255, 0)), 46);
/// ```
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

/// Maps a chat color to a terminal palette index.
///
/// Named chat colors land on the 16 base ANSI colors so terminal themes
/// apply to them.
pub fn text_color_to_ansi256(color: TextColor) -> u8 {
    match color {
        TextColor::Named(named) => match named {
            NamedColor::Black => 0,
            NamedColor::DarkRed => 1,
            NamedColor::DarkGreen => 2,
            NamedColor::Gold => 3,
            NamedColor::DarkBlue => 4,
            NamedColor::DarkPurple => 5,
            NamedColor::DarkAqua => 6,
            NamedColor::Gray => 7,
            NamedColor::DarkGray => 8,
            NamedColor::Red => 9,
            NamedColor::Green => 10,
            NamedColor::Yellow => 11,
            NamedColor::Blue => 12,
            NamedColor::LightPurple => 13,
            NamedColor::Aqua => 14,
            NamedColor::White => 15,
        },
        TextColor::Rgb(r, g, b) => rgb_to_ansi256((r, g, b)),
    }
}
