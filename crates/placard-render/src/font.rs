//! Substitution fonts.
//!
//! Two fixed transformations used by the `smallcaps` and `latin` tags:
//! letters to their small-capital look-alikes, and integers to Roman
//! numerals. Neither touches markup; the input is plain text.

/// A substitution font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    SmallCaps,
    Latin,
}

impl Font {
    pub fn from_name(name: &str) -> Option<Font> {
        match name.to_ascii_lowercase().as_str() {
            "smallcaps" => Some(Font::SmallCaps),
            "latin" => Some(Font::Latin),
            _ => None,
        }
    }

    /// Applies the font, or returns `None` when the input does not fit it
    /// (a non-integer for [`Font::Latin`]).
    pub fn apply(self, text: &str) -> Option<String> {
        match self {
            Font::SmallCaps => Some(small_caps(text)),
            Font::Latin => text.parse::<i32>().ok().map(|n| roman(n.into())),
        }
    }
}

/// Maps letters to small capitals; other characters pass through.
///
/// # Example
///
/// ```rust
/// use placard_render::font::small_caps;
///
/// assert_eq!(small_caps("Hello!"), "ʜᴇʟʟᴏ!");
/// ```
pub fn small_caps(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'a' => 'ᴀ',
            'b' => 'ʙ',
            'c' => 'ᴄ',
            'd' => 'ᴅ',
            'e' => 'ᴇ',
            'f' => 'ꜰ',
            'g' => 'ɢ',
            'h' => 'ʜ',
            'i' => 'ɪ',
            'j' => 'ᴊ',
            'k' => 'ᴋ',
            'l' => 'ʟ',
            'm' => 'ᴍ',
            'n' => 'ɴ',
            'o' => 'ᴏ',
            'p' => 'ᴘ',
            'q' => 'ǫ',
            'r' => 'ʀ',
            's' => 'ꜱ',
            't' => 'ᴛ',
            'u' => 'ᴜ',
            'v' => 'ᴠ',
            'w' => 'ᴡ',
            'y' => 'ʏ',
            'z' => 'ᴢ',
            other => other,
        })
        .collect()
}

const NUMERALS: [(i64, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Converts an integer to Roman numerals. Zero and negatives yield `""`.
pub fn roman(mut n: i64) -> String {
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_caps() {
        assert_eq!(small_caps("abcxyz"), "ᴀʙᴄxʏᴢ");
        assert_eq!(small_caps("VIP 1"), "ᴠɪᴘ 1");
    }

    #[test]
    fn test_roman() {
        assert_eq!(roman(1), "I");
        assert_eq!(roman(4), "IV");
        assert_eq!(roman(1994), "MCMXCIV");
        assert_eq!(roman(3999), "MMMCMXCIX");
        assert_eq!(roman(0), "");
        assert_eq!(roman(-5), "");
    }

    #[test]
    fn test_apply() {
        assert_eq!(Font::from_name("LATIN"), Some(Font::Latin));
        assert_eq!(Font::Latin.apply("12"), Some("XII".to_string()));
        assert_eq!(Font::Latin.apply("twelve"), None);
        assert_eq!(Font::Latin.apply(" 12"), None);
        assert_eq!(Font::SmallCaps.apply("ok"), Some("ᴏᴋ".to_string()));
        assert_eq!(Font::from_name("gothic"), None);
    }
}
