use placard_render::legacy::{AMPERSAND, SECTION};
use placard_render::{Decoration, Style, TextColor};

/// A color with optional decorations.
///
/// Used as a style span by the `p` tag, or exported as text in one of
/// several notations chosen by `args[0]`:
///
/// | `args[0]` | Output for `red` + bold |
/// |-----------|-------------------------|
/// | (none) | `red&l` |
/// | `closestname` | `red` |
/// | `legacy` | `&c&l` |
/// | `console` | `§c§l` |
/// | `mini` | `<red><bold>` |
///
/// An unparsable color resolves to the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPlaceholder {
    color: Option<TextColor>,
    decorations: Vec<Decoration>,
}

impl ColorPlaceholder {
    pub fn new(value: &str, decorations: impl IntoIterator<Item = Decoration>) -> Self {
        let mut decorations: Vec<Decoration> = decorations.into_iter().collect();
        decorations.sort_by_key(|d| d.code());
        decorations.dedup();
        Self {
            color: TextColor::parse(&value.to_lowercase()).ok(),
            decorations,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.color.is_some()
    }

    pub fn color(&self) -> Option<TextColor> {
        self.color
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// The span style injected by the `p` tag.
    pub fn style(&self) -> Option<Style> {
        let color = self.color?;
        Some(
            self.decorations
                .iter()
                .fold(Style::new().color(color), |style, d| style.decorate(*d, true)),
        )
    }

    fn codes(&self, marker: char) -> String {
        self.decorations
            .iter()
            .flat_map(|d| [marker, d.code()])
            .collect()
    }

    fn color_code(color: TextColor, marker: char) -> String {
        match color {
            TextColor::Named(named) => format!("{}{}", marker, named.code()),
            TextColor::Rgb(..) if marker == SECTION => {
                let hex = color.to_hex();
                let mut out = format!("{}x", SECTION);
                for c in hex.chars().skip(1) {
                    out.push(SECTION);
                    out.push(c);
                }
                out
            }
            TextColor::Rgb(..) => format!("{}{}", marker, color.to_hex()),
        }
    }

    pub(crate) fn resolve(&self, args: &[String]) -> String {
        let Some(color) = self.color else {
            return String::new();
        };
        let value = color.to_string();
        let Some(mode) = args.first() else {
            return value + &self.codes(AMPERSAND);
        };

        match mode.to_lowercase().as_str() {
            "closestname" => color.nearest_named().name().to_string(),
            "legacy" => Self::color_code(color, AMPERSAND) + &self.codes(AMPERSAND),
            "console" => Self::color_code(color, SECTION) + &self.codes(SECTION),
            "mini" => {
                let mut out = format!("<{}>", value);
                for d in &self.decorations {
                    out.push_str(&format!("<{}>", d.name()));
                }
                if args.len() > 1 {
                    out.push_str(&args.get(2..).unwrap_or_default().join(" "));
                    out.push_str(&format!("</{}>", value));
                    for d in &self.decorations {
                        out.push_str(&format!("</{}>", d.name()));
                    }
                }
                out
            }
            _ => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::args;
    use super::*;

    fn red_bold() -> ColorPlaceholder {
        ColorPlaceholder::new("RED", [Decoration::Bold])
    }

    #[test]
    fn test_named_notations() {
        let p = red_bold();
        assert_eq!(p.resolve(&[]), "red&l");
        assert_eq!(p.resolve(&args(&["closestname"])), "red");
        assert_eq!(p.resolve(&args(&["legacy"])), "&c&l");
        assert_eq!(p.resolve(&args(&["Console"])), "§c§l");
        assert_eq!(p.resolve(&args(&["mini"])), "<red><bold>");
        assert_eq!(p.resolve(&args(&["whatever"])), "red");
    }

    #[test]
    fn test_mini_wraps_trailing_args() {
        let p = red_bold();
        assert_eq!(
            p.resolve(&args(&["mini", "x", "Hello", "there"])),
            "<red><bold>Hello there</red></bold>"
        );
        assert_eq!(p.resolve(&args(&["mini", "x"])), "<red><bold></red></bold>");
    }

    #[test]
    fn test_hex_notations() {
        let p = ColorPlaceholder::new("#FF5556", []);
        assert_eq!(p.resolve(&[]), "#ff5556");
        assert_eq!(p.resolve(&args(&["legacy"])), "&#ff5556");
        assert_eq!(p.resolve(&args(&["console"])), "§x§f§f§5§5§5§6");
        assert_eq!(p.resolve(&args(&["closestname"])), "red");
    }

    #[test]
    fn test_invalid_color_is_empty() {
        let p = ColorPlaceholder::new("#zzzzzz", [Decoration::Italic]);
        assert!(!p.is_valid());
        assert!(p.style().is_none());
        assert_eq!(p.resolve(&[]), "");
        assert_eq!(p.resolve(&args(&["legacy"])), "");
    }

    #[test]
    fn test_style() {
        let style = red_bold().style().unwrap();
        assert_eq!(style.color, Some(TextColor::parse("red").unwrap()));
        assert_eq!(style.decoration(Decoration::Bold), Some(true));
        assert_eq!(style.decoration(Decoration::Italic), None);
    }
}
