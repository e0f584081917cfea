//! Legacy format codes.
//!
//! Legacy chat formatting prefixes a one-character code with a marker:
//! `§` on the wire, `&` in human-edited configuration.
//!
//! | Code | Meaning |
//! |------|---------|
//! | `0`-`9`, `a`-`f` | named color (resets decorations) |
//! | `k` `l` `m` `n` `o` | obfuscated, bold, strikethrough, underlined, italic |
//! | `r` | reset |
//! | `x` + six `<marker><hex>` pairs | RGB color, e.g. `§x§f§f§0§0§0§0` |
//! | `#rrggbb` | RGB color in the compact form, e.g. `&#ff0000` |

use crate::color::{NamedColor, TextColor};
use crate::style::{Decoration, Style};
use crate::text::{RichText, Run};

/// The section sign used on the wire.
pub const SECTION: char = '§';

/// The ampersand used in configuration files.
pub const AMPERSAND: char = '&';

const VALID_CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

/// How RGB colors are written by [`serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexFormat {
    /// `&#rrggbb`
    Compact,
    /// `§x§r§r§g§g§b§b`
    Repeated,
}

/// Replaces `alt` + code with `§` + lower-cased code.
///
/// Only recognised codes are translated; any other use of `alt` is kept.
///
/// # Example
///
/// ```rust
/// use placard_render::legacy::translate_alternate_codes;
///
/// assert_eq!(translate_alternate_codes('&', "&CHi & bye"), "§cHi & bye");
/// ```
pub fn translate_alternate_codes(alt: char, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == alt && VALID_CODES.contains(next) => {
                out.push(SECTION);
                out.push(next.to_ascii_lowercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

enum Code {
    Color(TextColor),
    Decoration(Decoration),
    Reset,
}

/// Reads the code starting at `chars[0]` (which is the marker).
fn read_code(chars: &[char], marker: char) -> Option<(Code, usize)> {
    let code = chars.get(1)?.to_ascii_lowercase();

    match code {
        'x' => {
            let mut hex = String::with_capacity(6);
            for pair in 0..6 {
                let at = 2 + pair * 2;
                if chars.get(at) != Some(&marker) {
                    return None;
                }
                let digit = *chars.get(at + 1)?;
                if !digit.is_ascii_hexdigit() {
                    return None;
                }
                hex.push(digit);
            }
            let color = TextColor::parse(&format!("#{}", hex)).ok()?;
            Some((Code::Color(color), 14))
        }
        '#' => {
            let hex: String = chars.get(2..8)?.iter().collect();
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            let color = TextColor::parse(&format!("#{}", hex)).ok()?;
            Some((Code::Color(color), 8))
        }
        'r' => Some((Code::Reset, 2)),
        c => NamedColor::from_code(c)
            .map(|named| (Code::Color(TextColor::Named(named)), 2))
            .or_else(|| Decoration::from_code(c).map(|d| (Code::Decoration(d), 2))),
    }
}

/// Parses legacy-coded text into rich text.
pub fn parse(text: &str, marker: char) -> RichText {
    let chars: Vec<char> = text.chars().collect();
    let mut runs = Vec::new();
    let mut style = Style::new();
    let mut buf = String::new();

    let mut i = 0;
    while i < chars.len() {
        if chars[i] == marker {
            if let Some((code, consumed)) = read_code(&chars[i..], marker) {
                if !buf.is_empty() {
                    runs.push(Run {
                        text: std::mem::take(&mut buf),
                        style: style.clone(),
                    });
                }
                style = match code {
                    Code::Color(color) => Style::new().color(color),
                    Code::Decoration(d) => style.decorate(d, true),
                    Code::Reset => Style::new(),
                };
                i += consumed;
                continue;
            }
        }
        buf.push(chars[i]);
        i += 1;
    }

    if !buf.is_empty() {
        runs.push(Run { text: buf, style });
    }
    RichText::from_runs(runs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LegacyState {
    color: Option<TextColor>,
    decorations: [bool; 5],
}

impl LegacyState {
    fn of(style: &Style) -> Self {
        Self {
            color: style.color,
            decorations: Decoration::ALL.map(|d| style.decoration(d) == Some(true)),
        }
    }

    fn is_plain(&self) -> bool {
        self.color.is_none() && !self.decorations.contains(&true)
    }
}

fn push_color(out: &mut String, marker: char, color: TextColor, hex: HexFormat) {
    out.push(marker);
    match color {
        TextColor::Named(named) => out.push(named.code()),
        TextColor::Rgb(..) => match hex {
            HexFormat::Compact => out.push_str(&color.to_hex()),
            HexFormat::Repeated => {
                out.push('x');
                for digit in color.to_hex().chars().skip(1) {
                    out.push(marker);
                    out.push(digit);
                }
            }
        },
    }
}

/// Serializes rich text with legacy codes.
///
/// Only color and decorations survive; click, hover, font and insertion
/// have no legacy form.
pub fn serialize(text: &RichText, marker: char, hex: HexFormat) -> String {
    let mut out = String::new();
    let mut current = LegacyState::of(&Style::new());

    for run in text.runs() {
        let state = LegacyState::of(&run.style);
        if state != current {
            match state.color {
                Some(color) => push_color(&mut out, marker, color, hex),
                None if !current.is_plain() => {
                    out.push(marker);
                    out.push('r');
                }
                None => {}
            }
            for (d, on) in Decoration::ALL.iter().zip(state.decorations) {
                if on {
                    out.push(marker);
                    out.push(d.code());
                }
            }
            current = state;
        }
        out.push_str(&run.text);
    }
    out
}

/// Removes every recognised code.
pub fn strip(text: &str, marker: char) -> String {
    parse(text, marker).plain()
}
