//! Output flavors.
//!
//! A [`Flavor`] is a flat serialization of rich text for one consumer:
//!
//! | Flavor | Keyword | Colors | Use |
//! |--------|---------|--------|-----|
//! | [`Flavor::Legacy`] | `legacy`, `l` | `&c`, `&#rrggbb` | configuration, other plugins |
//! | [`Flavor::Console`] | `console`, `c` | `§c`, `§x§r§r§g§g§b§b` | wire-level legacy text |
//! | [`Flavor::Mini`] | `mini`, `m` | `<red>`, `<#rrggbb>` | markup round trips |
//! | [`Flavor::Plain`] | | none | logs, comparisons |
//! | [`Flavor::Json`] | | component JSON | packets |
//! | [`Flavor::Ansi`] | | terminal escapes | server console |

use crate::legacy::{self, HexFormat, AMPERSAND, SECTION};
use crate::style::Decoration;
use crate::text::RichText;
use crate::util::text_color_to_ansi256;
use crate::{json, mini};

/// A flat text serialization of rich text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Legacy,
    Console,
    Mini,
    Plain,
    Json,
    Ansi,
}

impl Flavor {
    /// Parses a flavor keyword, case-insensitively.
    ///
    /// Only the three keyword flavors can be selected this way.
    ///
    /// # Example
    ///
    /// ```rust
    /// use placard_render::Flavor;
    ///
    /// assert_eq!(Flavor::from_keyword("L"), Some(Flavor::Legacy));
    /// assert_eq!(Flavor::from_keyword("json"), None);
    /// ```
    pub fn from_keyword(keyword: &str) -> Option<Flavor> {
        match keyword.to_ascii_lowercase().as_str() {
            "legacy" | "l" => Some(Flavor::Legacy),
            "console" | "c" => Some(Flavor::Console),
            "mini" | "m" => Some(Flavor::Mini),
            _ => None,
        }
    }

    pub fn encode(self, text: &RichText) -> String {
        encode(text, self)
    }
}

/// Serializes rich text in the given flavor.
pub fn encode(text: &RichText, flavor: Flavor) -> String {
    match flavor {
        Flavor::Legacy => legacy::serialize(text, AMPERSAND, HexFormat::Compact),
        Flavor::Console => legacy::serialize(text, SECTION, HexFormat::Repeated),
        Flavor::Mini => mini::serialize(text),
        Flavor::Plain => text.plain(),
        Flavor::Json => json::to_string(text),
        Flavor::Ansi => ansi(text),
    }
}

fn ansi(text: &RichText) -> String {
    let mut out = String::new();
    for run in text.runs() {
        let mut style = console::Style::new().force_styling(true);
        if let Some(color) = run.style.color {
            style = style.color256(text_color_to_ansi256(color));
        }
        if run.style.decoration(Decoration::Bold) == Some(true) {
            style = style.bold();
        }
        if run.style.decoration(Decoration::Italic) == Some(true) {
            style = style.italic();
        }
        if run.style.decoration(Decoration::Underlined) == Some(true) {
            style = style.underlined();
        }
        out.push_str(&style.apply_to(&run.text).to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TextColor;
    use crate::style::Style;

    fn sample() -> RichText {
        mini::parse("<red>Hi <bold>there</bold></red> <#123456>you")
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Flavor::from_keyword("legacy"), Some(Flavor::Legacy));
        assert_eq!(Flavor::from_keyword("Console"), Some(Flavor::Console));
        assert_eq!(Flavor::from_keyword("c"), Some(Flavor::Console));
        assert_eq!(Flavor::from_keyword("m"), Some(Flavor::Mini));
        assert_eq!(Flavor::from_keyword("plain"), None);
    }

    #[test]
    fn test_legacy_flavors() {
        assert_eq!(encode(&sample(), Flavor::Legacy), "&cHi &c&lthere&r &#123456you");
        assert_eq!(
            encode(&sample(), Flavor::Console),
            "§cHi §c§lthere§r §x§1§2§3§4§5§6you"
        );
    }

    #[test]
    fn test_plain_and_json() {
        assert_eq!(encode(&sample(), Flavor::Plain), "Hi there you");
        let json = encode(&RichText::text("x"), Flavor::Json);
        assert_eq!(json, r#"{"text":"x"}"#);
    }

    #[test]
    fn test_mini_flavor_reparses() {
        let encoded = encode(&sample(), Flavor::Mini);
        assert_eq!(mini::parse(&encoded).runs(), sample().runs());
    }

    #[test]
    fn test_ansi_flavor() {
        let text = RichText::styled(
            "x",
            Style::new()
                .color(TextColor::Rgb(255, 0, 0))
                .decorate(Decoration::Bold, true),
        );
        let out = encode(&text, Flavor::Ansi);
        assert!(out.contains("\x1b[38;5;196m"));
        assert!(out.contains("\x1b[1m"));
        assert!(out.contains('x'));
        assert_eq!(encode(&RichText::text("y"), Flavor::Ansi), "y");
    }
}
